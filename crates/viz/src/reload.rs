//! Config hot reload.
//!
//! Watches the tuning file. When it changes, the running aquarium is torn
//! down and rebuilt from the new values with the already loaded images.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};

use crate::loading::{HostPhase, SpriteLibrary};
use crate::runner::{canvas_texture, ActiveConfig, AquariumRun, HostConfig};

/// Plugin for reloading the scene when its config file changes.
pub struct ConfigReloadPlugin;

impl Plugin for ConfigReloadPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            reload_on_change.run_if(in_state(HostPhase::Running)),
        );
    }
}

/// Whether a file event touched the config file.
pub fn touches_config(event: &NotifyEvent, config_path: &Path) -> bool {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return false;
    }
    let Some(name) = config_path.file_name() else {
        return false;
    };
    event.paths.iter().any(|p| p.file_name() == Some(name))
}

/// File watching state stored in Local (doesn't need Send+Sync).
#[derive(Default)]
struct ConfigWatcherState {
    watcher: Option<RecommendedWatcher>,
    rx: Option<Receiver<Result<NotifyEvent, notify::Error>>>,
    initialized: bool,
}

impl ConfigWatcherState {
    fn ensure_initialized(&mut self, config_path: &Path) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        // Editors often replace the file, so watch its directory.
        let watch_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = channel();
        match RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        ) {
            Ok(mut watcher) => {
                if let Err(e) = watcher.watch(&watch_dir, RecursiveMode::NonRecursive) {
                    tracing::warn!("Failed to watch directory {:?}: {}", watch_dir, e);
                } else {
                    tracing::info!("Watching {:?} for config changes", config_path);
                    self.watcher = Some(watcher);
                    self.rx = Some(rx);
                }
            }
            Err(e) => tracing::warn!("Failed to create config watcher: {}", e),
        }
    }

    /// Drains queued events. True when any of them touched the config file.
    fn config_changed(&mut self, config_path: &Path) -> bool {
        let Some(rx) = &self.rx else {
            return false;
        };
        let mut changed = false;
        loop {
            match rx.try_recv() {
                Ok(Ok(event)) => changed |= touches_config(&event, config_path),
                Ok(Err(e)) => tracing::warn!("Config watch error: {}", e),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("Config watcher disconnected");
                    self.rx = None;
                    self.watcher = None;
                    break;
                }
            }
        }
        changed
    }
}

fn reload_on_change(
    mut state: Local<ConfigWatcherState>,
    host: Res<HostConfig>,
    library: Res<SpriteLibrary>,
    run: Option<ResMut<AquariumRun>>,
    mut active: ResMut<ActiveConfig>,
    mut images: ResMut<Assets<Image>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    state.ensure_initialized(&host.config_path);
    if !state.config_changed(&host.config_path) {
        return;
    }
    let Some(mut run) = run else {
        return;
    };
    let config = match host.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config change: {}", e);
            return;
        }
    };

    tracing::info!("Config changed, rebuilding the aquarium");
    if let Err(e) = run.rebuild(config.clone(), &library) {
        tracing::warn!("Keeping the current aquarium: {}", e);
        return;
    }

    let (width, height) = (config.scene.width, config.scene.height);
    if (width, height) != (active.0.scene.width, active.0.scene.height) {
        images.insert(run.texture().id(), canvas_texture(width, height));
        if let Ok(mut window) = windows.get_single_mut() {
            window.resolution.set(width as f32, height as f32);
        }
    }
    active.0 = config;
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn test_modify_of_config_file_triggers() {
        let path = Path::new("conf/aquarium.toml");
        let event = NotifyEvent::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/abs/conf/aquarium.toml"));
        assert!(touches_config(&event, path));

        let created = NotifyEvent::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("aquarium.toml"));
        assert!(touches_config(&created, path));
    }

    #[test]
    fn test_other_files_and_kinds_ignored() {
        let path = Path::new("aquarium.toml");
        let other = NotifyEvent::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("notes.txt"));
        assert!(!touches_config(&other, path));

        let access = NotifyEvent::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("aquarium.toml"));
        assert!(!touches_config(&access, path));
    }

    #[test]
    fn test_unwatched_state_reports_nothing() {
        let mut state = ConfigWatcherState::default();
        assert!(!state.config_changed(Path::new("aquarium.toml")));
    }
}
