//! TypeScript IR types for code generation.
//!
//! This module defines the TypeScript representation the emitters build:
//! - TsType: Types (primitives, arrays, unions, generics, references)
//! - TsTypeDef: Declarations (decorated classes, enums, aliases)
//! - TsExpr / TsStmt: Expressions and statements inside generated functions
//! - TsModule: One output file

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, any
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Literal type: 'foo'
    Literal(TsLiteral),
    /// Generic instantiation: Promise<T>, HTTPResponse<T>
    Generic { name: String, args: Vec<TsType> },
    /// Named type reference: Todo, Types.Todo, File
    Ref(String),
}

impl TsType {
    pub fn any() -> Self {
        Self::Primitive(TsPrimitive::Any)
    }

    pub fn string() -> Self {
        Self::Primitive(TsPrimitive::String)
    }

    pub fn generic(name: &str, args: Vec<TsType>) -> Self {
        Self::Generic {
            name: name.to_string(),
            args,
        }
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Any,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Null,
}

/// A class-validator decorator attached to a class field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    IsString,
    IsNumber,
    IsBoolean,
    IsArray,
    IsObject,
    /// `@IsEnum(Name)` or `@IsEnum(['a', 'b'])`
    IsEnum(EnumTarget),
    ValidateNested,
    IsOptional,
}

/// Argument of an `@IsEnum` decorator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumTarget {
    Named(String),
    Values(Vec<String>),
}

/// A decorated class field
#[derive(Debug, Clone, PartialEq)]
pub struct TsField {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
    pub validators: Vec<Validator>,
}

/// Type definition kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// `export class Foo extends Base { ... }`, plus a merged
    /// `export interface Foo extends B, C {}` for any further supertypes.
    Class {
        supertypes: Vec<String>,
        fields: Vec<TsField>,
    },
    /// `export enum Foo { KEY = 'value' }`
    Enum { members: Vec<(String, String)> },
    /// `export type Foo = ...`
    TypeAlias { ty: TsType },
}

/// Type definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    pub name: String,
    pub kind: TypeDefKind,
}

/// TypeScript expression
#[derive(Debug, Clone)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: 'bar', null
    Literal(TsLiteral),
    /// Function call: foo<T>(a, b)
    Call {
        callee: Box<TsExpr>,
        type_args: Vec<TsType>,
        args: Vec<TsExpr>,
    },
    /// Arrow function: (x) => x.foo, or with a block body
    Arrow {
        params: Vec<TsParam>,
        body: ArrowBody,
    },
    /// Object literal, printed on one line or one member per line
    Object {
        members: Vec<ObjectMember>,
        multiline: bool,
    },
    /// Template literal: `${foo}/bar`
    Template(Vec<TemplatePart>),
    /// Await expression: await fetch()
    Await(Box<TsExpr>),
    /// void expression: void promise
    Void(Box<TsExpr>),
    /// Array literal: [a, b, c]
    Array(Vec<TsExpr>),
    /// Raw code that doesn't fit the AST
    Raw(String),
}

impl TsExpr {
    pub fn ident(name: &str) -> Self {
        Self::Ident(name.to_string())
    }

    pub fn string(value: &str) -> Self {
        Self::Literal(TsLiteral::String(value.to_string()))
    }

    pub fn call(callee: &str, args: Vec<TsExpr>) -> Self {
        Self::Call {
            callee: Box::new(Self::ident(callee)),
            type_args: Vec::new(),
            args,
        }
    }
}

/// Body of an arrow function
#[derive(Debug, Clone)]
pub enum ArrowBody {
    Expr(Box<TsExpr>),
    Block(Vec<TsStmt>),
}

/// Object literal member
#[derive(Debug, Clone)]
pub enum ObjectMember {
    /// key: value
    Prop(String, TsExpr),
    /// ...value
    Spread(TsExpr),
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct TsParam {
    pub name: String,
    pub ty: Option<TsType>,
    pub optional: bool,
}

impl TsParam {
    pub fn new(name: &str, ty: TsType) -> Self {
        Self {
            name: name.to_string(),
            ty: Some(ty),
            optional: false,
        }
    }

    pub fn optional(name: &str, ty: TsType) -> Self {
        Self {
            optional: true,
            ..Self::new(name, ty)
        }
    }
}

/// Template literal part
#[derive(Debug, Clone)]
pub enum TemplatePart {
    /// Static string part
    Static(String),
    /// Dynamic expression part: ${expr}
    Dynamic(TsExpr),
}

// =============================================================================
// Module-Level IR (for printer)
// =============================================================================

/// Import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsImport {
    pub clause: ImportClause,
    /// Module path
    pub from: String,
}

/// What an import binds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportClause {
    /// import { a, b } from '...'
    Named(Vec<String>),
    /// import * as Ns from '...'
    Namespace(String),
}

/// Statement in a function body
#[derive(Debug, Clone)]
pub enum TsStmt {
    /// const declaration
    Const { name: String, init: TsExpr },
    /// Expression statement
    Expr(TsExpr),
    /// Return statement
    Return(TsExpr),
    /// Line comment
    Comment(String),
    /// Empty line
    Blank,
}

/// Function definition
#[derive(Debug, Clone)]
pub struct TsFunction {
    pub name: String,
    /// JSDoc summary line
    pub doc: Option<String>,
    pub params: Vec<TsParam>,
    pub return_type: Option<TsType>,
    pub body: Vec<TsStmt>,
    pub is_async: bool,
    pub is_export: bool,
}

/// Complete TypeScript module
#[derive(Debug, Clone, Default)]
pub struct TsModule {
    /// Leading comment lines, printed verbatim
    pub header: Vec<String>,
    pub imports: Vec<TsImport>,
    pub types: Vec<TsTypeDef>,
    pub functions: Vec<TsFunction>,
    /// `export * from '...'` targets
    pub reexports: Vec<String>,
}
