// ─── Process Builder ───
// Resolved version + launch options → concrete launch command.

use std::path::Path;

use tracing::{debug, info};

use crate::core::auth::Session;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::path::{path_str, MinecraftPath};
use crate::core::rules::LaunchContext;
use crate::core::version::{ArgumentTemplate, ResolvedVersion};

use super::arguments::{ArgumentBuilder, PlaceholderMap};
use super::classpath::{build_classpath, resolve_libraries, ResolvedLibrary};
use super::option::{
    LaunchOption, DEFAULT_JVM_ARGUMENTS, FEATURE_CUSTOM_RESOLUTION, FEATURE_DEMO_USER,
    FEATURE_QUICK_PLAY_MULTIPLAYER,
};
use super::process::{ProcessInvocation, ResolvedLaunchSpec};

const DEFAULT_ASSET_INDEX: &str = "legacy";
const DEFAULT_XUID: &str = "xuid";
const DEFAULT_CLIENT_ID: &str = "clientId";
const DEFAULT_USER_TYPE: &str = "Mojang";

/// Builds the launch command for one validated `LaunchOption`.
///
/// Holds no state beyond borrowed inputs, so separate launches can be built
/// concurrently.
pub struct ProcessBuilder<'a> {
    option: &'a LaunchOption,
    version: &'a ResolvedVersion,
    path: &'a MinecraftPath,
    session: &'a Session,
    java_path: &'a Path,
    context: LaunchContext,
}

impl<'a> ProcessBuilder<'a> {
    pub fn new(option: &'a LaunchOption) -> LauncherResult<Self> {
        option.check_valid()?;

        let (Some(version), Some(path), Some(session), Some(base_context), Some(java_path)) = (
            option.start_version.as_ref(),
            option.path.as_ref(),
            option.session.as_ref(),
            option.rules_context.as_ref(),
            option.java_path.as_deref(),
        ) else {
            return Err(LauncherError::InvalidLaunchOption(
                "launch option is incomplete".into(),
            ));
        };

        Ok(Self {
            option,
            version,
            path,
            session,
            java_path,
            context: base_context.with_features(option.features()),
        })
    }

    /// Rule context including the features activated by the options.
    pub fn context(&self) -> &LaunchContext {
        &self.context
    }

    pub fn natives_directory(&self) -> String {
        match &self.option.natives_directory {
            Some(dir) => path_str(dir),
            None => path_str(&self.path.natives_dir(&self.version.id)),
        }
    }

    pub fn build_launch_spec(&self) -> LauncherResult<ResolvedLaunchSpec> {
        let main_class = self
            .version
            .main_class
            .as_deref()
            .filter(|main| !main.trim().is_empty())
            .ok_or_else(|| LauncherError::MissingRequiredArgumentValue {
                name: "mainClass".into(),
            })?
            .to_string();

        let libraries = resolve_libraries(&self.version.libraries, &self.context, &self.path.library)?;
        let jar_path = self.path.version_jar_path(self.version.jar_id());
        let classpath = build_classpath(&libraries, &jar_path, &self.option.path_separator);

        let placeholders = self.build_placeholders(&classpath);
        let jvm_arguments = self.build_jvm_arguments(&placeholders)?;
        let game_arguments = self.build_game_arguments(&placeholders)?;

        let native_libraries: Vec<ResolvedLibrary> = libraries
            .into_iter()
            .filter(ResolvedLibrary::is_native)
            .collect();

        info!(
            "Launch spec for {}: {} JVM args, {} game args, {} native libraries",
            self.version.id,
            jvm_arguments.len(),
            game_arguments.len(),
            native_libraries.len()
        );

        Ok(ResolvedLaunchSpec {
            main_class,
            classpath,
            jvm_arguments,
            game_arguments,
            native_libraries,
        })
    }

    pub fn build_process(&self) -> LauncherResult<ProcessInvocation> {
        let spec = self.build_launch_spec()?;
        let process = ProcessInvocation::assemble(&spec, self.java_path, &self.path.base_path);
        debug!(
            "Launch command: {}",
            process.redacted_command_line(&[self.session.access_token.as_str()])
        );
        Ok(process)
    }

    fn build_placeholders(&self, classpath: &str) -> PlaceholderMap {
        let option = self.option;
        let session = self.session;
        let asset_id = self
            .version
            .asset_index_id
            .as_deref()
            .unwrap_or(DEFAULT_ASSET_INDEX);

        let mut map = PlaceholderMap::new();
        let mut set = |key: &str, value: Option<String>| {
            map.insert(key.to_string(), value);
        };

        set("library_directory", Some(path_str(&self.path.library)));
        set("natives_directory", Some(self.natives_directory()));
        set("launcher_name", Some(option.launcher_name.clone()));
        set("launcher_version", Some(option.launcher_version.clone()));
        set("classpath_separator", Some(option.path_separator.clone()));
        set("classpath", Some(classpath.to_string()));

        set("auth_player_name", Some(session.username.clone()));
        set("auth_uuid", Some(session.uuid.clone()));
        set("auth_access_token", Some(session.access_token.clone()));
        set("auth_session", Some(session.access_token.clone()));
        set(
            "auth_xuid",
            Some(session.xuid.clone().unwrap_or_else(|| DEFAULT_XUID.into())),
        );
        set(
            "user_type",
            Some(session.user_type.clone().unwrap_or_else(|| DEFAULT_USER_TYPE.into())),
        );
        set(
            "clientid",
            Some(option.client_id.clone().unwrap_or_else(|| DEFAULT_CLIENT_ID.into())),
        );
        set("user_properties", Some(option.user_properties.clone()));

        set("version_name", Some(self.version.id.clone()));
        set(
            "version_type",
            option
                .version_type
                .clone()
                .or_else(|| self.version.version_type.clone()),
        );
        set("game_directory", Some(path_str(&self.path.base_path)));
        set("assets_root", Some(path_str(&self.path.assets)));
        set("assets_index_name", Some(asset_id.to_string()));
        set("game_assets", Some(path_str(&self.path.asset_legacy_path(asset_id))));

        let resolution = option.has_custom_resolution();
        set("resolution_width", resolution.then(|| option.screen_width.to_string()));
        set("resolution_height", resolution.then(|| option.screen_height.to_string()));

        set("quickPlayPath", option.quick_play_path.clone());
        set("quickPlaySingleplayer", option.quick_play_singleplayer.clone());
        set("quickPlayMultiplayer", option.server_address());
        set("quickPlayRealms", option.quick_play_realms.clone());

        for (key, value) in &option.argument_dictionary {
            set(key, value.clone());
        }

        map
    }

    fn build_jvm_arguments(&self, placeholders: &PlaceholderMap) -> LauncherResult<Vec<String>> {
        let option = self.option;
        let mut builder = ArgumentBuilder::new(&self.context, placeholders);

        match &option.jvm_argument_overrides {
            Some(overrides) => builder.add_templates(&ArgumentTemplate::from_tokens(overrides))?,
            None => {
                if self.version.jvm_arguments.is_empty() {
                    builder.add_templates(&ArgumentTemplate::from_tokens(&DEFAULT_JVM_ARGUMENTS))?;
                } else {
                    builder.add_templates(&self.version.jvm_arguments)?;
                }
                builder.add_templates(&ArgumentTemplate::from_tokens(&option.extra_jvm_arguments))?;
            }
        }

        builder.try_add_natives_directory()?;
        builder.try_add_classpath()?;
        builder.try_add_xmx(option.maximum_ram_mb);
        builder.try_add_xms(option.minimum_ram_mb);

        if self.context.is_osx() {
            builder.try_add_dock_name(option.dock_name.as_deref());
            builder.try_add_dock_icon(option.dock_icon.as_deref());
        }

        if let Some(logging) = &self.version.logging {
            let file_id = logging.file_id.as_deref().unwrap_or(self.version.id.as_str());
            let config_path = path_str(&self.path.log_config_file_path(file_id));
            builder.try_add_logging(&logging.argument, &config_path)?;
        }

        Ok(builder.build())
    }

    fn build_game_arguments(&self, placeholders: &PlaceholderMap) -> LauncherResult<Vec<String>> {
        let option = self.option;
        let mut builder = ArgumentBuilder::new(&self.context, placeholders);

        builder.add_templates(&self.version.game_arguments)?;
        builder.add_templates(&ArgumentTemplate::from_tokens(&option.extra_game_arguments))?;

        if self.context.has_feature(FEATURE_DEMO_USER) {
            builder.set_demo();
        }
        if self.context.has_feature(FEATURE_CUSTOM_RESOLUTION) {
            builder.try_add_screen_resolution(option.screen_width, option.screen_height);
        }
        if self.context.has_feature(FEATURE_QUICK_PLAY_MULTIPLAYER) {
            builder.try_add_quick_play_multiplayer(option.server_address().as_deref());
        }
        if option.full_screen {
            builder.set_fullscreen();
        }

        Ok(builder.build())
    }
}
