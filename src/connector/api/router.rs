use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{
    AccessController, ConnectorController, FeederGateController, ResolveUrlController,
    ScheduleController,
};

pub struct Router<'a> {
    connector_controller: ConnectorController<'a>,
    schedule_controller: ScheduleController<'a>,
    feeder_gate_controller: FeederGateController<'a>,
    access_controller: AccessController<'a>,
    resolve_url_controller: ResolveUrlController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            connector_controller: ConnectorController::new(container),
            schedule_controller: ScheduleController::new(container),
            feeder_gate_controller: FeederGateController::new(container),
            access_controller: AccessController::new(container),
            resolve_url_controller: ResolveUrlController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Types => self.connector_controller.types().await,
            Commands::List { json } => self.connector_controller.list(json).await,
            Commands::Status { name } => self.connector_controller.status(name).await,
            Commands::Add {
                name,
                type_name,
                set,
                language,
            } => {
                self.connector_controller
                    .add(name, type_name, set, language)
                    .await
            }
            Commands::Update {
                name,
                set,
                language,
            } => self.connector_controller.update(name, set, language).await,
            Commands::Config { name } => self.connector_controller.config(name).await,
            Commands::Form {
                type_name,
                connector,
                language,
            } => {
                self.connector_controller
                    .form(type_name, connector, language)
                    .await
            }
            Commands::Schedule {
                name,
                load,
                retry_delay,
                intervals,
            } => {
                self.schedule_controller
                    .schedule(name, load, retry_delay, intervals)
                    .await
            }
            Commands::Remove { name } => self.connector_controller.remove(name).await,
            Commands::Restart { name } => self.connector_controller.restart(name).await,
            Commands::FeederGate { host, port } => self.feeder_gate_controller.set(host, port).await,
            Commands::CheckGate { proxy } => self.feeder_gate_controller.check(proxy).await,
            Commands::Authenticate {
                name,
                username,
                password,
                domain,
            } => {
                self.access_controller
                    .authenticate(name, username, password, domain)
                    .await
            }
            Commands::Authorize {
                name,
                username,
                docids,
            } => self.access_controller.authorize(name, username, docids).await,
            Commands::ResolveUrl {
                connector,
                prop,
                acl,
                inherit_from,
            } => self
                .resolve_url_controller
                .resolve(connector, prop, acl, inherit_from),
        }
    }
}
