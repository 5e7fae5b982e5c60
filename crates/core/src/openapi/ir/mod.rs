//! Intermediate representation for TypeScript code generation.
//!
//! - `types`: TypeScript AST (TsType, TsTypeDef, TsExpr, TsStmt, TsFunction, TsModule)
//! - `codegen`: classified operations and schemas -> TypeScript AST
//! - `emit`: TypeScript AST -> code strings (via the `Emit` trait)
//! - `utils`: identifier and string helpers shared across modules

pub mod codegen;
pub mod emit;
pub mod types;
pub mod utils;

pub use emit::Emit;
