// ─── Rules ───
// Mojang allow/disallow rules and their evaluation against a LaunchContext.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::context::LaunchContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Regular expression matched against the OS version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeMap<String, bool>>,
}

impl Rule {
    pub fn allow() -> Self {
        Self {
            action: RuleAction::Allow,
            os: None,
            features: None,
        }
    }

    pub fn disallow() -> Self {
        Self {
            action: RuleAction::Disallow,
            os: None,
            features: None,
        }
    }

    pub fn for_os(mut self, name: &str) -> Self {
        self.os.get_or_insert_with(OsRule::default).name = Some(name.to_string());
        self
    }

    pub fn with_feature(mut self, name: &str, expected: bool) -> Self {
        self.features
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), expected);
        self
    }

    /// Whether every constraint of this rule is satisfied by `ctx`.
    /// A rule without constraints always matches.
    pub fn matches(&self, ctx: &LaunchContext) -> bool {
        if let Some(os) = &self.os {
            if !os_matches(os, ctx) {
                return false;
            }
        }

        match &self.features {
            Some(features) => features
                .iter()
                .all(|(name, expected)| ctx.has_feature(name) == *expected),
            None => true,
        }
    }
}

fn os_matches(os: &OsRule, ctx: &LaunchContext) -> bool {
    if let Some(name) = &os.name {
        if name != &ctx.os_name {
            return false;
        }
    }

    if let Some(arch) = &os.arch {
        if arch != &ctx.os_arch {
            return false;
        }
    }

    if let Some(pattern) = &os.version {
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(&ctx.os_version) {
                    return false;
                }
            }
            Err(e) => {
                debug!("Ignoring rule with invalid os.version pattern {:?}: {}", pattern, e);
                return false;
            }
        }
    }

    true
}

/// Evaluate a rule set.
///
/// - No rules → allowed.
/// - Otherwise start from "disallowed" and walk the rules top to bottom;
///   every matching rule overwrites the state with its own action.
pub fn applies(rules: &[Rule], ctx: &LaunchContext) -> bool {
    if rules.is_empty() {
        return true;
    }

    let mut allowed = false;
    for rule in rules {
        if rule.matches(ctx) {
            allowed = rule.action == RuleAction::Allow;
        }
    }
    allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::context::{OS_LINUX, OS_OSX, OS_WINDOWS};

    fn ctx(os: &str) -> LaunchContext {
        LaunchContext::new(os, "x64")
    }

    #[test]
    fn no_rules_means_allowed() {
        for os in [OS_LINUX, OS_OSX, OS_WINDOWS] {
            assert!(applies(&[], &ctx(os)));
        }
    }

    #[test]
    fn allow_then_disallow_osx() {
        let rules = vec![Rule::allow(), Rule::disallow().for_os("osx")];

        assert!(applies(&rules, &ctx(OS_LINUX)));
        assert!(applies(&rules, &ctx(OS_WINDOWS)));
        assert!(!applies(&rules, &ctx(OS_OSX)));
    }

    #[test]
    fn single_allow_for_other_os_is_disallowed() {
        let rules = vec![Rule::allow().for_os("windows")];
        assert!(!applies(&rules, &ctx(OS_LINUX)));
        assert!(applies(&rules, &ctx(OS_WINDOWS)));
    }

    #[test]
    fn feature_constraints_follow_active_set() {
        let rules = vec![Rule::allow().with_feature("has_custom_resolution", true)];
        let plain = ctx(OS_LINUX);
        let custom = plain.with_features(["has_custom_resolution"]);

        assert!(!applies(&rules, &plain));
        assert!(applies(&rules, &custom));

        let inverted = vec![Rule::allow().with_feature("is_demo_user", false)];
        assert!(applies(&inverted, &plain));
        assert!(!applies(&inverted, &plain.with_features(["is_demo_user"])));
    }

    #[test]
    fn os_version_is_a_pattern_and_arch_is_exact() {
        let rules: Vec<Rule> = serde_json::from_value(serde_json::json!([
            {"action": "allow", "os": {"name": "osx", "version": "^10\\.5\\.\\d$"}}
        ]))
        .unwrap();

        let old_mac = LaunchContext::new(OS_OSX, "x64").with_os_version("10.5.8");
        let new_mac = LaunchContext::new(OS_OSX, "x64").with_os_version("14.1");
        assert!(applies(&rules, &old_mac));
        assert!(!applies(&rules, &new_mac));

        let x86_only: Vec<Rule> = serde_json::from_value(serde_json::json!([
            {"action": "allow", "os": {"arch": "x86"}}
        ]))
        .unwrap();
        assert!(applies(&x86_only, &LaunchContext::new(OS_WINDOWS, "x86")));
        assert!(!applies(&x86_only, &LaunchContext::new(OS_WINDOWS, "x64")));
    }

    #[test]
    fn invalid_version_pattern_never_matches() {
        let rules = vec![Rule {
            action: RuleAction::Disallow,
            os: Some(OsRule {
                name: None,
                version: Some("(".into()),
                arch: None,
            }),
            features: None,
        }];
        // The only rule cannot match, so the default "disallowed" remains.
        assert!(!applies(&rules, &ctx(OS_LINUX)));
    }

    #[test]
    fn later_matching_rule_wins() {
        let rules = vec![
            Rule::disallow(),
            Rule::allow().for_os("linux"),
            Rule::disallow().with_feature("is_demo_user", true),
        ];
        let linux = ctx(OS_LINUX);
        assert!(applies(&rules, &linux));
        assert!(!applies(&rules, &linux.with_features(["is_demo_user"])));
    }
}
