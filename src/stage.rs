//! Runtime registry of widget mount targets.
//!
//! A [`Stage`] maps container identifiers to [`Container`] records, the
//! native stand-in for a page's mount elements. Widgets are mounted against
//! a registered container by id; mounting against an unknown id is a silent
//! no-op at the widget API (the stage itself is never mutated). This keeps
//! widget registration explicit instead of hanging state off an ambient
//! global namespace.

use rustc_hash::FxHashMap;

/// A single mount target: a named rectangle a widget surface attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    width: u32,
    height: u32,
    surface_attached: bool,
}

impl Container {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            surface_attached: false,
        }
    }

    /// Current pixel width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current pixel height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current pixel dimensions as `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether a widget surface is currently attached to this container.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.surface_attached
    }

    pub(crate) fn attach_surface(&mut self) {
        self.surface_attached = true;
    }

    pub(crate) fn detach_surface(&mut self) {
        self.surface_attached = false;
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// Registry of mount targets, keyed by container id.
#[derive(Debug, Default)]
pub struct Stage {
    containers: FxHashMap<String, Container>,
}

impl Stage {
    /// Create an empty stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container with the given id and pixel size.
    ///
    /// Re-registering an existing id resets it (supports remount).
    pub fn register(&mut self, id: impl Into<String>, width: u32, height: u32) {
        let _ = self
            .containers
            .insert(id.into(), Container::new(width, height));
    }

    /// Look up a container by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.containers.get_mut(id)
    }

    /// Update a container's size, returning `false` for an unknown id.
    pub fn resize(&mut self, id: &str, width: u32, height: u32) -> bool {
        match self.containers.get_mut(id) {
            Some(container) => {
                container.set_size(width, height);
                true
            }
            None => false,
        }
    }

    /// Number of registered containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Whether no containers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut stage = Stage::new();
        stage.register("hero", 800, 600);
        let container = stage.get("hero").unwrap();
        assert_eq!(container.size(), (800, 600));
        assert!(!container.has_surface());
        assert!(stage.get("missing").is_none());
    }

    #[test]
    fn resize_updates_dimensions_exactly() {
        let mut stage = Stage::new();
        stage.register("hero", 800, 600);
        assert!(stage.resize("hero", 400, 300));
        assert_eq!(stage.get("hero").unwrap().size(), (400, 300));
    }

    #[test]
    fn resize_unknown_container_is_a_no_op() {
        let mut stage = Stage::new();
        stage.register("hero", 800, 600);
        assert!(!stage.resize("missing", 1, 1));
        assert_eq!(stage.len(), 1);
        assert_eq!(stage.get("hero").unwrap().size(), (800, 600));
    }

    #[test]
    fn detach_removes_the_surface() {
        let mut stage = Stage::new();
        stage.register("hero", 800, 600);
        stage.get_mut("hero").unwrap().attach_surface();
        assert!(stage.get("hero").unwrap().has_surface());

        stage.get_mut("hero").unwrap().detach_surface();
        assert!(!stage.get("hero").unwrap().has_surface());
        // The container itself survives teardown and can be remounted.
        assert_eq!(stage.get("hero").unwrap().size(), (800, 600));
    }

    #[test]
    fn reregister_resets_attachment() {
        let mut stage = Stage::new();
        stage.register("hero", 800, 600);
        stage.get_mut("hero").unwrap().attach_surface();
        assert!(stage.get("hero").unwrap().has_surface());
        stage.register("hero", 800, 600);
        assert!(!stage.get("hero").unwrap().has_surface());
    }
}
