//! # Template Compiler Core
//!
//! Turns an annotated template tree into render-function source text for a
//! companion runtime. Parsing happens upstream: the input here is an arena of
//! element/text/comment nodes with directive metadata already attached, and
//! the output is a result record holding the dynamic render body plus one
//! body per hoisted static sub-tree.
//!
//! ## Compilation Invariants
//!
//! 1. **Two phases, one tree.** `optimize` mutates classification flags in
//!    place; `generate` reads the tree and never mutates it (the directive
//!    pre-pass is the only mutation inside `generate`, guarded per node).
//!
//! 2. **No abort path.** Every anomaly degrades to a conservative codegen
//!    choice plus an advisory diagnostic through the injected warn sink; the
//!    compile always returns a result record.
//!
//! 3. **Deterministic output.** Compiling the same tree with the same options
//!    twice yields byte-identical sources, including hoisted-list indices and
//!    once ids, because traversal order is a pure function of the tree.
//!
//! 4. **Intrinsics are configuration.** All emitted code calls the runtime
//!    through the names in [`Intrinsics`]; the compiler never assumes what
//!    those calls do.
//!
//! 5. **Nested compiles are isolated.** Inline-template sub-compiles get a
//!    fresh accumulator sharing only the immutable options, and run to
//!    completion before the parent's data object continues.

mod ast;
mod codegen;
mod directives;
mod events;
mod optimizer;
mod options;


pub use ast::*;
pub use codegen::{
    gen_children, gen_data, gen_element, gen_for, gen_if, generate, hash, CodegenResult,
    CodegenState,
};
pub use directives::base_directives;
pub use events::gen_handlers;
pub use optimizer::optimize;
pub use options::{base_warn, CompilerOptions, DirectiveGen, Intrinsics, ModuleGen, WarnSink};

/// Compile driver: analyze, then emit. The parser collaborator builds the
/// [`Template`]; an empty template still produces a fixed creation call.
pub fn compile(template: &mut Template, options: &CompilerOptions) -> CodegenResult {
    optimize(template, options);
    generate(template, options)
}
