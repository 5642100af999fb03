//! Interop annotation metadata.
//!
//! Annotations are attached by the front end to libraries, classes, inline
//! containers and members. The lowering pass only ever reads them, through the
//! query functions at the bottom of this module.

/// Interop annotations on a single declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Name given by a JS annotation. `Some("")` when the annotation is
    /// present without a name.
    pub js_name: Option<String>,
    /// Public JS-interop annotation.
    pub js_interop: bool,
    /// Internal JS-interop annotation, used by the new interop libraries.
    pub internal_js_interop: bool,
    /// Static-interop annotation on a class.
    pub static_interop: bool,
    /// Anonymous object-literal container.
    pub anonymous: bool,
    /// Native (host-provided) class annotation.
    pub native: bool,
    /// Host values of this type may be trusted to match their static type.
    pub trust_types: bool,
}

impl Annotations {
    /// Public JS annotation carrying `name`.
    pub fn js(name: impl Into<String>) -> Self {
        Self {
            js_name: Some(name.into()),
            js_interop: true,
            ..Self::default()
        }
    }

    /// Internal JS annotation carrying `name`.
    pub fn internal_js(name: impl Into<String>) -> Self {
        Self {
            js_name: Some(name.into()),
            internal_js_interop: true,
            ..Self::default()
        }
    }

    /// Native class annotation.
    pub fn native() -> Self {
        Self {
            native: true,
            ..Self::default()
        }
    }

    pub fn with_static_interop(mut self) -> Self {
        self.static_interop = true;
        self
    }

    pub fn with_anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    pub fn with_trust_types(mut self) -> Self {
        self.trust_types = true;
        self
    }
}

/// Declarations that carry interop annotations.
pub trait Annotated {
    fn annotations(&self) -> &Annotations;
}

// =============================================================================
// Annotation queries
// =============================================================================

/// The JS name of a declaration, or `""` when none was given.
pub fn js_name(node: &impl Annotated) -> &str {
    node.annotations().js_name.as_deref().unwrap_or("")
}

pub fn is_js_interop(node: &impl Annotated) -> bool {
    node.annotations().js_interop
}

pub fn is_internal_js_interop(node: &impl Annotated) -> bool {
    node.annotations().internal_js_interop
}

pub fn is_static_interop(node: &impl Annotated) -> bool {
    node.annotations().static_interop
}

pub fn is_anonymous_literal_container(node: &impl Annotated) -> bool {
    node.annotations().anonymous
}

pub fn is_native(node: &impl Annotated) -> bool {
    node.annotations().native
}

pub fn trusts_static_types(node: &impl Annotated) -> bool {
    node.annotations().trust_types
}

impl Annotated for Annotations {
    fn annotations(&self) -> &Annotations {
        self
    }
}
