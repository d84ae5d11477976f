// ─── Interface Core ───
// Version resolution and launch command synthesis for Minecraft.
//
// Architecture:
//   core/
//     rules/    Launch context + allow/disallow rule evaluation
//     version/  Version JSON, inheritance chains, manifest + loaders
//     maven/    Coordinate parsing and repository layout
//     launch/   Classpath, argument templates, process assembly
//     java/     Java runtime discovery
//     auth/     Player session handed to the game
//     path.rs   Game directory layout
//     launcher.rs Facade over all of the above

pub mod auth;
pub mod error;
pub mod java;
pub mod launch;
pub mod launcher;
pub mod maven;
pub mod path;
pub mod rules;
pub mod version;
