//! Scene components and their reflection surface.
//!
//! The [`Component`] trait provides component-level introspection with
//! integrated egui inspector support via [`inspect_ui`](Component::inspect_ui)
//! and capability registration via
//! [`register_capabilities`](Component::register_capabilities).
//!
//! Components can be any `Send + Sync + 'static` type. Use
//! `#[derive(Component)]` from [`capref_macro`] to auto-implement the trait;
//! the `#[provides(...)]` attribute lists the capability traits a component
//! satisfies.

use std::any::Any;

use crate::capability::CapabilityRegistry;
use crate::inspect::Inspect;

/// Trait for scene components.
///
/// Components are stored type-erased (`Box<dyn Component>`) on their entity,
/// so everything the editor and the capability system need goes through the
/// trait object: the display name, `Any` access for downcasting, and the
/// inspector body.
///
/// # Deriving
///
/// ```ignore
/// #[derive(Component)]
/// #[provides(Damageable)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
/// ```
///
/// # Manual implementation
///
/// ```ignore
/// impl Component for CustomType {
///     fn component_name(&self) -> &'static str {
///         "CustomType"
///     }
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///     fn as_any_mut(&mut self) -> &mut dyn Any {
///         self
///     }
/// }
/// ```
///
/// Manual implementations register their capabilities by overriding
/// [`register_capabilities`](Self::register_capabilities), usually through
/// the [`register_capability!`](crate::register_capability) macro.
pub trait Component: Send + Sync + 'static {
    /// Returns the struct name (e.g. `"Transform"`).
    fn component_name(&self) -> &'static str;

    /// `Any` access for capability casters and concrete-type queries.
    fn as_any(&self) -> &dyn Any;

    /// Mutable `Any` access.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Render an inspector UI for this component's fields.
    ///
    /// The derive macro generates this by calling
    /// [`Inspect::show`](crate::inspect::Inspect) for each field. The default
    /// renders nothing.
    fn inspect_ui(&mut self, _ui: &mut egui::Ui) {}

    /// Register the capability casts this component type provides.
    ///
    /// Called once per concrete type when it first enters a
    /// [`Scene`](crate::Scene). The `#[derive(Component)]` macro generates
    /// this from `#[provides(...)]` attributes; the default registers
    /// nothing.
    fn register_capabilities(_registry: &mut CapabilityRegistry)
    where
        Self: Sized,
    {
    }
}

/// Debug name for an entity.
///
/// Stores an owned string. Use this to give entities meaningful labels
/// for debugging and editor display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Name(pub String);

impl Name {
    /// Create a new name from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Component for Name {
    fn component_name(&self) -> &'static str {
        "Name"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn inspect_ui(&mut self, ui: &mut egui::Ui) {
        Inspect(&mut self.0).show("name", ui);
    }
}
