//! Script files and prewired services for tests.

use crate::doubles::{RecordingPlatform, StubHandler};
use crate::TestResult;
use oshell_core::{CommandRegistry, CommandService, KeyMapService, ShellResult};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// A script written to a temporary file, deleted on drop.
#[derive(Debug)]
pub struct ScriptFile {
    file: NamedTempFile,
}

impl ScriptFile {
    /// Write `contents` verbatim; line endings are not normalised.
    pub fn new(contents: &str) -> TestResult<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// `source <path>` command line for this file.
    pub fn source_command(&self) -> String {
        format!("source {}", self.path().display())
    }
}

/// Collection of deterministic test fixtures.
pub struct Fixtures;

impl Fixtures {
    /// A rc file exercising every keymap command.
    pub fn sample_rc() -> &'static str {
        "# sample rc\r\n\
         \r\n\
         newkmap root\r\n\
         topkmap root C-a\r\n\
         definekey root c set border 2\r\n\
         definekey top colon help\r\n\
         undefinekey top colon\r\n\
         set padding 0 0 0 0\r\n"
    }

    /// A started keymap service over `platform`.
    pub fn keymap_service(platform: Arc<RecordingPlatform>) -> Arc<KeyMapService> {
        let service = Arc::new(KeyMapService::new(platform));
        // A fresh service always starts.
        let _ = service.start();
        service
    }

    /// A running command service with one command per stub.
    pub fn stub_service(stubs: &[Arc<StubHandler>]) -> ShellResult<Arc<CommandService>> {
        let registry = stubs
            .iter()
            .fold(CommandRegistry::builder(), |builder, stub| {
                builder.register(stub.spec(), stub.clone())
            })
            .build()?;
        Ok(Arc::new(CommandService::with_registry(registry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_file_keeps_line_endings() {
        let script = ScriptFile::new("a\rb\r\nc").unwrap();
        let raw = std::fs::read(script.path()).unwrap();
        assert_eq!(raw, b"a\rb\r\nc");
        assert!(script.source_command().starts_with("source "));
    }

    #[test]
    fn test_stub_service_registers_each_stub() {
        let stubs = vec![
            Arc::new(StubHandler::new("stubcmd", true)),
            Arc::new(StubHandler::new("stubcmd2", false)),
        ];
        let service = Fixtures::stub_service(&stubs).unwrap();
        assert_eq!(service.registry().unwrap().names(), vec!["stubcmd", "stubcmd2"]);
    }

    #[test]
    fn test_keymap_service_is_running() {
        let service = Fixtures::keymap_service(Arc::new(RecordingPlatform::new()));
        assert_eq!(service.state(), oshell_core::ServiceState::Running);
    }
}
