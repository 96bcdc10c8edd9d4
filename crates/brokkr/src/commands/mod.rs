//! Built-in commands
//!
//! Each command is a small struct implementing `Command` plus its declared
//! schema. `registrations()` is the host's contribution to the command
//! registry; declaration order matters because the registry keeps the
//! first registration on a name collision.

mod create;
mod extension;
mod init;
mod server;
mod version;

pub use create::CreateCommand;
pub use extension::ExtensionInstallCommand;
pub use init::InitCommand;
pub use server::{ServerStartCommand, ServerStopCommand};
pub use version::VersionCommand;

use brokkr_core::command::CommandRegistration;

/// All built-in command registrations, in registration order
pub fn registrations() -> Vec<CommandRegistration> {
    vec![
        CreateCommand::registration(),
        InitCommand::registration(),
        ServerStartCommand::registration(),
        ServerStopCommand::registration(),
        ExtensionInstallCommand::registration(),
        VersionCommand::registration(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registration_declares_a_name() {
        for registration in registrations() {
            assert!(registration.schema.primary_name().is_some());
        }
    }

    #[test]
    fn registered_names_are_unique() {
        let mut names: Vec<String> = registrations()
            .iter()
            .filter_map(|r| r.schema.primary_name().map(str::to_string))
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn server_commands_are_gradle_tagged() {
        for registration in registrations() {
            let name = registration.schema.primary_name().unwrap();
            if name.starts_with("server ") {
                assert_eq!(registration.profiles, vec!["gradle".to_string()]);
            }
        }
    }
}
