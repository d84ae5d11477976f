// ─── Argument Builder ───
// Turns argument templates into concrete command line tokens.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::rules::{applies, LaunchContext};
use crate::core::version::ArgumentTemplate;

/// Placeholder name → value. A `None` value counts as unset.
pub type PlaceholderMap = BTreeMap<String, Option<String>>;

/// Entries referencing these must never be dropped silently.
const MANDATORY_PLACEHOLDERS: [&str; 2] = ["classpath", "natives_directory"];

pub const NATIVES_PROPERTY: &str = "-Djava.library.path=";
pub const CLASSPATH_FLAGS: [&str; 3] = ["-cp", "-classpath", "--class-path"];

/// Accumulates tokens for one section of the command line (JVM or game).
pub struct ArgumentBuilder<'a> {
    ctx: &'a LaunchContext,
    placeholders: &'a PlaceholderMap,
    args: Vec<String>,
}

impl<'a> ArgumentBuilder<'a> {
    pub fn new(ctx: &'a LaunchContext, placeholders: &'a PlaceholderMap) -> Self {
        Self {
            ctx,
            placeholders,
            args: Vec::new(),
        }
    }

    /// Append every template whose rules apply, with placeholders replaced.
    pub fn add_templates(&mut self, templates: &[ArgumentTemplate]) -> LauncherResult<()> {
        self.add_templates_with(templates, self.placeholders)
    }

    fn add_templates_with(
        &mut self,
        templates: &[ArgumentTemplate],
        placeholders: &PlaceholderMap,
    ) -> LauncherResult<()> {
        // Index of a lone flag emitted by the previous entry, if any.
        let mut pending_flag: Option<usize> = None;

        for template in templates {
            if !applies(&template.rules, self.ctx) {
                pending_flag = None;
                continue;
            }

            match interpolate_all(&template.values, placeholders) {
                Ok(values) => {
                    pending_flag = match values.as_slice() {
                        [single] if is_flag(single) => Some(self.args.len()),
                        _ => None,
                    };
                    self.args.extend(values);
                }
                Err(missing) => {
                    if template.values.iter().any(|value| references_mandatory(value)) {
                        return Err(LauncherError::MissingRequiredArgumentValue { name: missing });
                    }

                    trace!("Dropping argument {:?}: ${{{}}} is unset", template.values, missing);
                    let lone_value = matches!(template.values.as_slice(), [value] if !value.starts_with('-'));
                    if let Some(index) = pending_flag.take() {
                        if lone_value && index + 1 == self.args.len() {
                            drop_dangling_option(&mut self.args);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Append plain tokens without rule evaluation or interpolation.
    pub fn add_literals<S: AsRef<str>>(&mut self, tokens: &[S]) {
        self.args.extend(
            tokens
                .iter()
                .map(|token| token.as_ref().trim())
                .filter(|token| !token.is_empty())
                .map(ToString::to_string),
        );
    }

    pub fn contains_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg == flag)
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.args.iter().any(|arg| arg.starts_with(prefix))
    }

    pub fn try_add_natives_directory(&mut self) -> LauncherResult<()> {
        if self.contains_prefix(NATIVES_PROPERTY) {
            return Ok(());
        }
        self.add_templates(&[ArgumentTemplate::literal(format!(
            "{}${{natives_directory}}",
            NATIVES_PROPERTY
        ))])
    }

    pub fn try_add_classpath(&mut self) -> LauncherResult<()> {
        if CLASSPATH_FLAGS.iter().any(|flag| self.contains_flag(flag)) {
            return Ok(());
        }
        self.add_templates(&[ArgumentTemplate::tokens(["-cp", "${classpath}"])])
    }

    /// `-Xmx<mb>m`, skipped when `mb` is 0 or a heap limit is already set.
    pub fn try_add_xmx(&mut self, mb: u32) {
        self.try_add_memory("-Xmx", mb);
    }

    pub fn try_add_xms(&mut self, mb: u32) {
        self.try_add_memory("-Xms", mb);
    }

    fn try_add_memory(&mut self, prefix: &str, mb: u32) {
        if mb == 0 || self.contains_prefix(prefix) {
            return;
        }
        self.args.push(format!("{}{}m", prefix, mb));
    }

    pub fn try_add_dock_name(&mut self, name: Option<&str>) {
        self.try_add_property("-Xdock:name=", name);
    }

    pub fn try_add_dock_icon(&mut self, icon: Option<&str>) {
        self.try_add_property("-Xdock:icon=", icon);
    }

    fn try_add_property(&mut self, prefix: &str, value: Option<&str>) {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            return;
        };
        if self.contains_prefix(prefix) {
            return;
        }
        self.args.push(format!("{}{}", prefix, value));
    }

    /// Logging configuration argument with `${path}` pointing at the config file.
    pub fn try_add_logging(&mut self, argument: &str, config_path: &str) -> LauncherResult<()> {
        let already_set = match argument.split_once('=') {
            Some((flag, _)) => self.contains_prefix(&format!("{}=", flag)),
            None => self.contains_flag(argument),
        };
        if already_set {
            return Ok(());
        }

        let mut placeholders = self.placeholders.clone();
        placeholders.insert("path".into(), Some(config_path.to_string()));
        self.add_templates_with(&[ArgumentTemplate::literal(argument)], &placeholders)
    }

    pub fn set_demo(&mut self) {
        if !self.contains_flag("--demo") {
            self.args.push("--demo".into());
        }
    }

    pub fn try_add_screen_resolution(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if self.contains_flag("--width") || self.contains_flag("--height") {
            return;
        }
        self.args.extend([
            "--width".to_string(),
            width.to_string(),
            "--height".to_string(),
            height.to_string(),
        ]);
    }

    pub fn try_add_quick_play_multiplayer(&mut self, address: Option<&str>) {
        let Some(address) = address else {
            return;
        };
        if self.contains_flag("--quickPlayMultiplayer") || self.contains_flag("--server") {
            return;
        }
        self.args
            .extend(["--quickPlayMultiplayer".to_string(), address.to_string()]);
    }

    pub fn set_fullscreen(&mut self) {
        if !self.contains_flag("--fullscreen") {
            self.args.push("--fullscreen".into());
        }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn build(self) -> Vec<String> {
        debug!("Built {} argument tokens", self.args.len());
        self.args
    }
}

/// Replace every `${name}` in `value`. Returns the first unset name on failure.
///
/// Names are case-sensitive. An unterminated `${` is kept literally.
pub fn interpolate(value: &str, placeholders: &PlaceholderMap) -> Result<String, String> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let name = &rest[start + 2..start + 2 + len];
        let replacement = placeholders
            .get(name)
            .and_then(|v| v.as_deref())
            .ok_or_else(|| name.to_string())?;

        out.push_str(&rest[..start]);
        out.push_str(replacement);
        rest = &rest[start + 2 + len + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn interpolate_all(values: &[String], placeholders: &PlaceholderMap) -> Result<Vec<String>, String> {
    values
        .iter()
        .map(|value| interpolate(value, placeholders))
        .collect()
}

/// Names of all `${...}` placeholders in `value`.
pub fn placeholder_names(value: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        names.push(&rest[start + 2..start + 2 + len]);
        rest = &rest[start + 2 + len + 1..];
    }
    names
}

fn references_mandatory(value: &str) -> bool {
    placeholder_names(value)
        .iter()
        .any(|name| MANDATORY_PLACEHOLDERS.contains(name))
}

fn is_flag(value: &str) -> bool {
    value.starts_with('-') && !value.contains("${")
}

fn drop_dangling_option(args: &mut Vec<String>) {
    if args.last().is_some_and(|last| last.starts_with('-')) {
        let _ = args.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{Rule, OS_LINUX, OS_OSX};

    fn placeholders(pairs: &[(&str, &str)]) -> PlaceholderMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    fn linux() -> LaunchContext {
        LaunchContext::new(OS_LINUX, "x64")
    }

    #[test]
    fn interpolation_replaces_every_occurrence() {
        let map = placeholders(&[("a", "1"), ("b", "two")]);
        assert_eq!(interpolate("${a}-${b}-${a}", &map).unwrap(), "1-two-1");
        assert_eq!(interpolate("plain", &map).unwrap(), "plain");
        assert_eq!(interpolate("open ${a", &map).unwrap(), "open ${a");
        assert_eq!(interpolate("${A}", &map).unwrap_err(), "A");
    }

    #[test]
    fn unset_values_count_as_missing() {
        let mut map = placeholders(&[]);
        map.insert("gone".into(), None);
        assert_eq!(interpolate("${gone}", &map).unwrap_err(), "gone");
    }

    #[test]
    fn lists_reflect_template_order_and_rules() {
        let ctx = linux();
        let map = placeholders(&[("auth_player_name", "Alex")]);
        let mut builder = ArgumentBuilder::new(&ctx, &map);
        builder
            .add_templates(&[
                ArgumentTemplate::tokens(["--username", "${auth_player_name}"]),
                ArgumentTemplate::conditional(
                    vec![Rule::allow().for_os(OS_OSX)],
                    vec!["-XstartOnFirstThread".into()],
                ),
                ArgumentTemplate::literal("--demo-less"),
            ])
            .unwrap();

        assert_eq!(builder.build(), vec!["--username", "Alex", "--demo-less"]);
    }

    #[test]
    fn entry_with_missing_placeholder_is_dropped_whole() {
        let ctx = linux();
        let map = placeholders(&[("version_name", "1.20.1")]);
        let mut builder = ArgumentBuilder::new(&ctx, &map);
        builder
            .add_templates(&[
                ArgumentTemplate::tokens(["--uuid", "${auth_uuid}"]),
                ArgumentTemplate::tokens(["--version", "${version_name}"]),
            ])
            .unwrap();

        assert_eq!(builder.build(), vec!["--version", "1.20.1"]);
    }

    #[test]
    fn split_legacy_flag_is_removed_with_its_value() {
        let ctx = linux();
        let map = placeholders(&[("version_name", "1.8.9")]);
        let mut builder = ArgumentBuilder::new(&ctx, &map);
        builder
            .add_templates(&ArgumentTemplate::from_command_line(
                "--uuid ${auth_uuid} --version ${version_name} --userProperties ${user_properties}",
            ))
            .unwrap();

        assert_eq!(builder.build(), vec!["--version", "1.8.9"]);
    }

    #[test]
    fn missing_mandatory_placeholder_is_an_error() {
        let ctx = linux();
        let map = placeholders(&[]);
        let mut builder = ArgumentBuilder::new(&ctx, &map);

        let err = builder.try_add_classpath().unwrap_err();
        assert!(matches!(err, LauncherError::MissingRequiredArgumentValue { name } if name == "classpath"));

        let err = builder
            .add_templates(&[ArgumentTemplate::literal("-Djava.library.path=${natives_directory}")])
            .unwrap_err();
        assert!(
            matches!(err, LauncherError::MissingRequiredArgumentValue { name } if name == "natives_directory")
        );
    }

    #[test]
    fn try_add_helpers_do_not_duplicate() {
        let ctx = linux();
        let map = placeholders(&[("classpath", "a.jar"), ("natives_directory", "/n")]);
        let mut builder = ArgumentBuilder::new(&ctx, &map);
        builder.add_literals(&["-classpath", "custom.jar", "-Xmx512m"]);

        builder.try_add_classpath().unwrap();
        builder.try_add_natives_directory().unwrap();
        builder.try_add_natives_directory().unwrap();
        builder.try_add_xmx(4096);
        builder.try_add_xms(1024);
        builder.try_add_xms(2048);

        assert_eq!(
            builder.build(),
            vec![
                "-classpath",
                "custom.jar",
                "-Xmx512m",
                "-Djava.library.path=/n",
                "-Xms1024m"
            ]
        );
    }

    #[test]
    fn logging_argument_points_at_config_file() {
        let ctx = linux();
        let map = placeholders(&[]);
        let mut builder = ArgumentBuilder::new(&ctx, &map);
        builder
            .try_add_logging(
                "-Dlog4j.configurationFile=${path}",
                "/mc/assets/log_configs/client-1.12.xml",
            )
            .unwrap();
        builder
            .try_add_logging("-Dlog4j.configurationFile=${path}", "/other.xml")
            .unwrap();

        assert_eq!(
            builder.build(),
            vec!["-Dlog4j.configurationFile=/mc/assets/log_configs/client-1.12.xml"]
        );
    }

    #[test]
    fn game_extras_are_added_once() {
        let ctx = linux();
        let map = placeholders(&[]);
        let mut builder = ArgumentBuilder::new(&ctx, &map);
        builder.add_literals(&["--width", "800", "--height", "600"]);

        builder.set_demo();
        builder.set_demo();
        builder.try_add_screen_resolution(1920, 1080);
        builder.try_add_quick_play_multiplayer(Some("mc.example.org:25566"));
        builder.set_fullscreen();

        assert_eq!(
            builder.build(),
            vec![
                "--width",
                "800",
                "--height",
                "600",
                "--demo",
                "--quickPlayMultiplayer",
                "mc.example.org:25566",
                "--fullscreen"
            ]
        );
    }
}
