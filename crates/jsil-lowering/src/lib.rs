//! JS interop lowering and unchecked-call optimization for the jsil IR.
//!
//! The pass gives external interop members bodies that forward to the
//! primitive interop operations, and rewrites checked primitive calls into
//! arity-specialized unchecked variants when every argument is provably
//! interop-safe.
//!
//! ```ignore
//! let lowering = InteropLowering::new(&program, LoweringOptions::default())?;
//! let stats = lowering.transform_program(&mut program);
//! ```

// Pass configuration
pub mod options;
pub use options::{DEFAULT_LEGACY_JS_ANNOTATION_LIBRARIES, LoweringOptions, OptionsError};

// Interop primitives and core types resolved against a program
pub mod catalog;
pub use catalog::{CatalogError, CheckedCall, CoreTypes, InteropCatalog, Primitive};

// Read-only program snapshot shared by library traversals
pub mod program_facts;
pub use program_facts::ProgramFacts;

// Scoped static typing
pub mod static_type_context;
pub use static_type_context::StaticTypeContext;

// Extension and inline-container member lookup
pub mod member_index;
pub use member_index::{DeclaredKind, MemberDescriptor, MemberIndex};

// JS name resolution
pub mod js_names;
pub use js_names::JsNameResolver;

// Unchecked-call optimization
pub mod unchecked_calls;
pub use unchecked_calls::{Optimized, UncheckedCallOptimizer};

// Bodies for external interop members
pub mod body_synthesis;
pub use body_synthesis::{BodySynthesizer, SynthesizedBody};

// Pass driver
pub mod interop_pass;
pub use interop_pass::{InteropLowering, LoweringStats};

// Subscriber setup for hosts
pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};
