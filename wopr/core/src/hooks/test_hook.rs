//! Manually armed hook for exercising the hook pipeline end to end.

use super::{Hook, HookError};
use crate::alert::{AlertLevel, AlertMessage};

/// Event name of the built-in test hook.
pub const TEST_HOOK_EVENT: &str = "test_trigger";

/// Hook that fires exactly once per manual arm.
#[derive(Debug, Default)]
pub struct TestHook {
    armed: bool,
}

impl Hook for TestHook {
    fn event_name(&self) -> &str {
        TEST_HOOK_EVENT
    }

    fn check(&mut self) -> Result<bool, HookError> {
        Ok(std::mem::take(&mut self.armed))
    }

    fn get_message(&self) -> Option<AlertMessage> {
        Some(AlertMessage::for_level(TEST_HOOK_EVENT, AlertLevel::Warning))
    }

    fn trigger(&mut self) -> bool {
        self.armed = true;
        true
    }
}
