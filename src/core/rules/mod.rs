mod context;
mod rule;

pub use context::{current_arch, current_os_name, LaunchContext, OS_LINUX, OS_OSX, OS_WINDOWS};
pub use rule::{applies, OsRule, Rule, RuleAction};
