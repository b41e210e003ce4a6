use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// List the available connector types
    Types,

    /// List registered connectors with their type and schedule
    List {
        #[arg(long)]
        json: bool,
    },

    Status {
        name: String,
    },

    /// Create a connector
    Add {
        name: String,

        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Configuration entry as KEY=VALUE, may be repeated
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        #[arg(short, long, default_value = "en")]
        language: String,
    },

    /// Replace the whole configuration of an existing connector
    Update {
        name: String,

        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        #[arg(short, long, default_value = "en")]
        language: String,
    },

    /// Print a connector's configuration
    Config {
        name: String,
    },

    /// Print the configuration form of a type, or of an existing connector
    Form {
        #[arg(value_name = "TYPE", required_unless_present = "connector")]
        type_name: Option<String>,

        #[arg(short, long, conflicts_with = "type_name")]
        connector: Option<String>,

        #[arg(short, long, default_value = "en")]
        language: String,
    },

    Schedule {
        name: String,

        #[arg(long)]
        load: u32,

        /// Delay before retrying a failed traversal, in milliseconds
        #[arg(long, default_value = "300000")]
        retry_delay: u64,

        /// Time intervals, e.g. "1-2:4-8"
        #[arg(long, default_value = "")]
        intervals: String,
    },

    Remove {
        name: String,
    },

    /// Clear a connector's traversal checkpoint so it starts over
    Restart {
        name: String,
    },

    /// Set the feeder gate location
    FeederGate {
        host: String,

        port: u16,
    },

    /// Probe the configured feeder gate over HTTP
    CheckGate {
        #[arg(long)]
        proxy: Option<String>,
    },

    Authenticate {
        name: String,

        username: String,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        domain: Option<String>,
    },

    /// Print the document ids the user may see
    Authorize {
        name: String,

        username: String,

        #[arg(required = true)]
        docids: Vec<String>,
    },

    /// Resolve the feed URL of a document given as properties
    ResolveUrl {
        /// Connector the document belongs to
        connector: String,

        /// Document property as NAME=VALUE, may be repeated
        #[arg(short, long = "prop", value_name = "NAME=VALUE")]
        prop: Vec<String>,

        /// Treat the document as an ACL record
        #[arg(long)]
        acl: bool,

        /// Resolve the URL the document inherits its ACL from instead
        #[arg(long, conflicts_with = "acl")]
        inherit_from: bool,
    },
}
