//! Ordered collections of verifiers with a cached capability projection.
//!
//! A [`VerifierGroup`] owns its verifiers exclusively, so every structural
//! mutation flows through version-bumping methods. The derived cache of
//! [`ResolvedCapability`] entries is trusted only while its build version
//! matches the group version; a group mutated after a build transparently
//! rebuilds on the next read instead of serving stale entries.
//!
//! Scene-side changes (a referenced component despawning or detaching after
//! a build) are not version-tracked: iteration skips entries that no longer
//! resolve, and [`verify`](VerifierGroup::verify) is the sweep that surfaces
//! them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::capability::CapabilityCaster;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::scene::{ComponentRef, Scene};
use crate::verifier::Verifier;

/// One cache entry: a reference that satisfied the capability at build time,
/// plus the caster resolved for its concrete component type.
///
/// Holding the caster makes per-frame iteration a plain lookup and fn call,
/// with no registry or type checks on the hot path.
pub struct ResolvedCapability<T: ?Sized> {
    reference: ComponentRef,
    caster: CapabilityCaster<T>,
}

impl<T: ?Sized> ResolvedCapability<T> {
    /// The reference this entry was resolved from.
    pub fn reference(&self) -> ComponentRef {
        self.reference
    }

    /// Re-borrows the capability from the scene.
    ///
    /// `None` when the target despawned or detached after the cache build.
    pub fn get<'a>(&self, scene: &'a Scene) -> Option<&'a T> {
        scene
            .get(self.reference)
            .and_then(|component| self.caster.cast(component))
    }
}

impl<T: ?Sized> Clone for ResolvedCapability<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ResolvedCapability<T> {}

impl<T: ?Sized> std::fmt::Debug for ResolvedCapability<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCapability")
            .field("reference", &self.reference)
            .finish()
    }
}

struct GroupCache<T: ?Sized> {
    built_version: u64,
    entries: Vec<ResolvedCapability<T>>,
}

/// An ordered collection of [`Verifier<T>`] with batch validation and a
/// versioned cache of resolved capability instances.
///
/// The verifier sequence is authoritative; the cache is a rebuildable
/// projection holding one entry per *valid* verifier, in declaration order,
/// invalid ones skipped. Reads rebuild lazily whenever the cache is absent
/// or was built at an older version of the sequence.
///
/// Serialization persists the verifier sequence only. A deserialized group
/// starts unbuilt, so the first read recomputes against the live scene.
pub struct VerifierGroup<T: ?Sized> {
    verifiers: Vec<Verifier<T>>,
    version: u64,
    cache: Option<GroupCache<T>>,
}

impl<T: ?Sized + 'static> VerifierGroup<T> {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self {
            verifiers: Vec::new(),
            version: 0,
            cache: None,
        }
    }

    /// Creates a group from an existing verifier sequence, preserving order.
    pub fn from_verifiers(verifiers: Vec<Verifier<T>>) -> Self {
        Self {
            verifiers,
            version: 0,
            cache: None,
        }
    }

    /// Creates a group of `len` empty verifiers, for fixed-slot authoring
    /// shapes where the count is known up front.
    pub fn with_len(len: usize) -> Self {
        Self::from_verifiers(vec![Verifier::new(); len])
    }

    pub fn len(&self) -> usize {
        self.verifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verifiers.is_empty()
    }

    /// Shared view of the verifier sequence.
    pub fn verifiers(&self) -> &[Verifier<T>] {
        &self.verifiers
    }

    pub fn verifier(&self, index: usize) -> Option<&Verifier<T>> {
        self.verifiers.get(index)
    }

    /// Mutable access to one verifier.
    ///
    /// Counts as a structural mutation: any handed-out `&mut` may rewrite
    /// the reference, so the cache version is bumped up front.
    pub fn verifier_mut(&mut self, index: usize) -> Option<&mut Verifier<T>> {
        self.version += 1;
        self.verifiers.get_mut(index)
    }

    /// Appends a verifier.
    pub fn push(&mut self, verifier: Verifier<T>) {
        self.version += 1;
        self.verifiers.push(verifier);
    }

    /// Inserts a verifier at `index`, shifting later ones.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, verifier: Verifier<T>) {
        self.version += 1;
        self.verifiers.insert(index, verifier);
    }

    /// Removes and returns the verifier at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Verifier<T> {
        self.version += 1;
        self.verifiers.remove(index)
    }

    /// Rewrites the stored reference of the verifier at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set_reference(&mut self, index: usize, reference: Option<ComponentRef>) {
        self.version += 1;
        self.verifiers[index].set_reference(reference);
    }

    /// Removes all verifiers.
    pub fn clear(&mut self) {
        self.version += 1;
        self.verifiers.clear();
    }

    /// Diagnostic sweep: reports one [`Diagnostic::InvalidReference`] per
    /// currently-invalid verifier, in declaration order.
    ///
    /// Does not stop on the first failure, does not gate anything, and emits
    /// nothing when every verifier is valid. The cache is not touched.
    pub fn verify(&self, scene: &Scene, sink: &dyn DiagnosticSink) {
        let capability = scene.capability_label::<T>();
        for (index, verifier) in self.verifiers.iter().enumerate() {
            if !verifier.is_valid(scene) {
                sink.report(Diagnostic::InvalidReference {
                    index,
                    component: referenced_name(scene, verifier),
                    capability,
                });
            }
        }
    }

    /// Unconditionally rebuilds the cache from the verifier sequence.
    ///
    /// Walks verifiers in declaration order, appending an entry per valid
    /// one; each invalid verifier is reported like [`verify`](Self::verify)
    /// and skipped, so the cache is shorter than the sequence when any are
    /// invalid.
    pub fn rebuild_cache(&mut self, scene: &Scene, sink: &dyn DiagnosticSink) {
        let entries = self.build_entries(scene, sink);
        self.cache = Some(GroupCache {
            built_version: self.version,
            entries,
        });
    }

    /// The cached entries, rebuilding first if the cache is absent or was
    /// built at an older version. The one read with a side effect.
    pub fn cached_capabilities(
        &mut self,
        scene: &Scene,
        sink: &dyn DiagnosticSink,
    ) -> &[ResolvedCapability<T>] {
        let fresh = matches!(&self.cache, Some(cache) if cache.built_version == self.version);
        if !fresh {
            self.rebuild_cache(scene, sink);
        }
        match &self.cache {
            Some(cache) => &cache.entries,
            None => &[],
        }
    }

    /// Invokes `action` for every cached entry that still resolves,
    /// rebuilding lazily like [`cached_capabilities`](Self::cached_capabilities).
    ///
    /// Entries whose target disappeared after the build are skipped
    /// silently. Zero valid verifiers means zero invocations; never panics.
    pub fn for_each(
        &mut self,
        scene: &Scene,
        sink: &dyn DiagnosticSink,
        mut action: impl FnMut(&T),
    ) {
        for entry in self.cached_capabilities(scene, sink) {
            if let Some(instance) = entry.get(scene) {
                action(instance);
            }
        }
    }

    fn build_entries(
        &self,
        scene: &Scene,
        sink: &dyn DiagnosticSink,
    ) -> Vec<ResolvedCapability<T>> {
        let capability = scene.capability_label::<T>();
        let mut entries = Vec::with_capacity(self.verifiers.len());
        for (index, verifier) in self.verifiers.iter().enumerate() {
            let resolved = verifier.reference().and_then(|reference| {
                scene
                    .resolved_caster::<T>(reference)
                    .map(|caster| ResolvedCapability { reference, caster })
            });
            match resolved {
                Some(entry) => entries.push(entry),
                None => sink.report(Diagnostic::InvalidReference {
                    index,
                    component: referenced_name(scene, verifier),
                    capability,
                }),
            }
        }
        entries
    }
}

fn referenced_name<T: ?Sized + 'static>(
    scene: &Scene,
    verifier: &Verifier<T>,
) -> Option<&'static str> {
    verifier
        .reference()
        .and_then(|reference| scene.get(reference))
        .map(|component| component.component_name())
}

impl<T: ?Sized + 'static> Default for VerifierGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for VerifierGroup<T> {
    fn clone(&self) -> Self {
        // The clone starts unbuilt; its first read recomputes.
        Self {
            verifiers: self.verifiers.clone(),
            version: 0,
            cache: None,
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for VerifierGroup<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierGroup")
            .field("verifiers", &self.verifiers)
            .field("version", &self.version)
            .finish()
    }
}

impl<T: ?Sized> Serialize for VerifierGroup<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.verifiers.serialize(serializer)
    }
}

impl<'de, T: ?Sized> Deserialize<'de> for VerifierGroup<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            verifiers: Vec::<Verifier<T>>::deserialize(deserializer)?,
            version: 0,
            cache: None,
        })
    }
}
