//! The viewer session: the loaded model, its override tree and the texture registry.
//!
//! A [`Viewer`] is driven from a single frame loop. Loading is blocking. A new
//! model is imported completely before the previous one is dropped, so a failed
//! import leaves the session exactly as it was.

use std::path::{Path, PathBuf};

use anyhow::bail;
use instant::Instant;

use crate::{
    config::{OverrideConfig, ViewerConfig},
    data_structures::{
        overrides::ModelOverrides,
        scene_graph::ImportedScene,
        texture::{Texture, TextureId, TextureOrigin, TextureRegistry},
    },
    editor,
    render::{DrawParams, MeshRenderer, draw_frame, resolve_frame},
    resources::{display_name, import_model, texture::load_texture},
};

/// An imported scene together with the override tree that shadows it.
pub struct LoadedModel {
    path: PathBuf,
    scene: ImportedScene,
    overrides: ModelOverrides,
}

impl LoadedModel {
    pub fn new(path: PathBuf, scene: ImportedScene) -> Self {
        let overrides = ModelOverrides::from_scene(&scene);
        Self {
            path,
            scene,
            overrides,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.scene.name()
    }

    pub fn scene(&self) -> &ImportedScene {
        &self.scene
    }

    pub fn overrides(&self) -> &ModelOverrides {
        &self.overrides
    }

    pub fn overrides_mut(&mut self) -> &mut ModelOverrides {
        &mut self.overrides
    }
}

/// The last user-facing message and how long it has been up.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: String,
    shown_for: f32,
    visible: bool,
}

impl StatusLine {
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.shown_for = 0.0;
        self.visible = true;
    }

    /// Advances the display timer and hides the message after `duration` seconds.
    pub fn tick(&mut self, dt: f32, duration: f32) {
        if !self.visible {
            return;
        }
        self.shown_for += dt;
        if self.shown_for > duration {
            self.visible = false;
            self.shown_for = 0.0;
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.visible.then_some(self.message.as_str())
    }
}

pub struct Viewer {
    config: ViewerConfig,
    model: Option<LoadedModel>,
    textures: TextureRegistry<Texture>,
    status: StatusLine,
    config_path: Option<PathBuf>,
    started: Instant,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            model: None,
            textures: TextureRegistry::new(),
            status: StatusLine::default(),
            config_path: None,
            started: Instant::now(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ViewerConfig {
        &mut self.config
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut LoadedModel> {
        self.model.as_mut()
    }

    pub fn textures(&self) -> &TextureRegistry<Texture> {
        &self.textures
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Seconds since the viewer was created; drives the locate pulse.
    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Imports `path` with the configured flags and replaces the current model.
    ///
    /// On failure the current model, its overrides and the registry are untouched
    /// and the error is both returned and put on the status line.
    pub fn load_model(&mut self, path: &Path) -> anyhow::Result<()> {
        let imported = match import_model(path, self.config.import_flags) {
            Ok(imported) => imported,
            Err(e) => {
                log::error!("{:#}", e);
                self.status.set(format!("Failed to load {}: {:#}", path.display(), e));
                return Err(e);
            }
        };

        // the previous model and everything it contributed go away as a whole
        self.model = None;
        self.textures.clear_embedded();
        for texture in imported.textures {
            self.textures.register(texture, TextureOrigin::Embedded);
        }

        let loaded = LoadedModel::new(path.to_path_buf(), imported.scene);
        self.status.set(format!("Loaded model {}", loaded.name()));
        self.model = Some(loaded);
        Ok(())
    }

    /// Imports the current model again, e.g. after the import flags changed.
    ///
    /// Returns `false` when there is nothing to reload.
    pub fn reload_model(&mut self) -> anyhow::Result<bool> {
        let Some(path) = self.model.as_ref().map(|model| model.path.clone()) else {
            self.status.set("No model to reload");
            return Ok(false);
        };
        self.load_model(&path)?;
        Ok(true)
    }

    /// Loads standalone textures. They stay available across model swaps.
    ///
    /// Stops at the first file that fails; textures loaded before it stay registered.
    pub fn load_textures(&mut self, paths: &[PathBuf]) -> anyhow::Result<Vec<TextureId>> {
        let mut ids = Vec::with_capacity(paths.len());
        let mut names = Vec::with_capacity(paths.len());
        for path in paths {
            let texture = match load_texture(path) {
                Ok(texture) => texture,
                Err(e) => {
                    self.status.set(format!("Failed to load texture: {:#}", e));
                    return Err(e);
                }
            };
            names.push(texture.label.clone());
            ids.push(self.textures.register(texture, TextureOrigin::Standalone));
        }
        self.status
            .set(format!("Loaded textures\n{}", names.join("\n")));
        Ok(ids)
    }

    /// Assigns a registered texture to a mesh of the current model.
    pub fn assign_texture(
        &mut self,
        part: usize,
        mesh: usize,
        texture: TextureId,
    ) -> anyhow::Result<()> {
        let Some(model) = &mut self.model else {
            bail!("no model loaded");
        };
        editor::assign_texture(&mut model.overrides, &self.textures, part, mesh, texture)
    }

    pub fn resolve(&self) -> Vec<DrawParams> {
        self.resolve_at(self.elapsed())
    }

    /// Resolves the current model at a given time; empty when nothing is loaded.
    pub fn resolve_at(&self, elapsed: f32) -> Vec<DrawParams> {
        match &self.model {
            Some(model) => resolve_frame(&model.scene, &model.overrides, &self.textures, elapsed),
            None => Vec::new(),
        }
    }

    /// Runs the per-frame work: status timer, then one draw per mesh.
    pub fn frame(&mut self, dt: f32, renderer: &mut dyn MeshRenderer<Texture>) {
        self.status.tick(dt, self.config.status_duration);
        if let Some(model) = &self.model {
            let elapsed = self.elapsed();
            draw_frame(&model.scene, &model.overrides, &self.textures, elapsed, renderer);
        }
    }

    /// Saves the override tree. Without a path, the last used config path is reused.
    pub fn save_overrides(&mut self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let Some(model) = &self.model else {
            bail!("no model loaded");
        };
        let path = match path.map(Path::to_path_buf).or_else(|| self.config_path.clone()) {
            Some(path) => path,
            None => bail!("no config path chosen yet"),
        };
        OverrideConfig::capture(model.name(), &model.overrides, &self.textures).save(&path)?;
        self.status.set(format!(
            "Saved config {}",
            display_name(&path.to_string_lossy())
        ));
        self.config_path = Some(path.clone());
        Ok(path)
    }

    pub fn load_overrides(&mut self, path: &Path) -> anyhow::Result<()> {
        let Some(model) = &mut self.model else {
            bail!("no model loaded");
        };
        let config = OverrideConfig::load(path)?;
        if config.model != model.name() {
            log::warn!(
                "config {} was saved for {}, applying to {}",
                path.display(),
                config.model,
                model.name()
            );
        }
        config.apply(&mut model.overrides, &self.textures)?;
        self.config_path = Some(path.to_path_buf());
        self.status.set(format!(
            "Loaded config {}",
            display_name(&path.to_string_lossy())
        ));
        Ok(())
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
