//! TypeScript code emission via the Emit trait.
//!
//! This module provides a trait-based approach to converting TypeScript AST nodes
//! to string representations. Each AST type implements `Emit` for clean, composable
//! code generation. Output uses two-space indentation and single-quoted strings.

use super::types::{
    ArrowBody, EnumTarget, ImportClause, ObjectMember, TemplatePart, TsExpr, TsField, TsFunction,
    TsImport, TsLiteral, TsModule, TsParam, TsPrimitive, TsStmt, TsType, TsTypeDef, TypeDefKind,
    Validator,
};
use super::utils::{escape_ts_string, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

fn join<T: Emit>(items: &[T], sep: &str) -> String {
    items.iter().map(Emit::emit).collect::<Vec<_>>().join(sep)
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Any => "any".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("'{}'", escape_ts_string(s)),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap unions in parentheses
                if matches!(**inner, TsType::Union(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => join(types, " | "),
            TsType::Literal(lit) => lit.emit(),
            TsType::Generic { name, args } => format!("{name}<{}>", join(args, ", ")),
            TsType::Ref(name) => name.clone(),
        }
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for Validator {
    fn emit(&self) -> String {
        match self {
            Validator::IsString => "@IsString()".to_string(),
            Validator::IsNumber => "@IsNumber()".to_string(),
            Validator::IsBoolean => "@IsBoolean()".to_string(),
            Validator::IsArray => "@IsArray()".to_string(),
            Validator::IsObject => "@IsObject()".to_string(),
            Validator::IsEnum(EnumTarget::Named(name)) => format!("@IsEnum({name})"),
            Validator::IsEnum(EnumTarget::Values(values)) => {
                let items: Vec<_> = values
                    .iter()
                    .map(|v| TsLiteral::String(v.clone()).emit())
                    .collect();
                format!("@IsEnum([{}])", items.join(", "))
            }
            Validator::ValidateNested => "@ValidateNested()".to_string(),
            Validator::IsOptional => "@IsOptional()".to_string(),
        }
    }
}

impl Emit for TsField {
    fn emit(&self) -> String {
        let mut output = String::new();
        for validator in &self.validators {
            output.push_str(&format!("  {}\n", validator.emit()));
        }
        let opt = if self.optional { "?" } else { "" };
        output.push_str(&format!(
            "  {}{}: {};\n",
            quote_if_needed(&self.name),
            opt,
            self.ty.emit()
        ));
        output
    }
}

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        match &self.kind {
            TypeDefKind::Class { supertypes, fields } => {
                let extends = supertypes
                    .first()
                    .map(|base| format!(" extends {base}"))
                    .unwrap_or_default();
                let mut output = format!("export class {}{}", self.name, extends);
                if fields.is_empty() {
                    output.push_str(" {}\n");
                } else {
                    output.push_str(" {\n");
                    output.push_str(&join(fields, "\n"));
                    output.push_str("}\n");
                }
                if supertypes.len() > 1 {
                    output.push_str(&format!(
                        "export interface {} extends {} {{}}\n",
                        self.name,
                        supertypes[1..].join(", ")
                    ));
                }
                output
            }
            TypeDefKind::Enum { members } => {
                let mut output = format!("export enum {} {{\n", self.name);
                for (key, value) in members {
                    output.push_str(&format!(
                        "  {} = {},\n",
                        key,
                        TsLiteral::String(value.clone()).emit()
                    ));
                }
                output.push_str("}\n");
                output
            }
            TypeDefKind::TypeAlias { ty } => {
                format!("export type {} = {};\n", self.name, ty.emit())
            }
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for TsExpr {
    fn emit(&self) -> String {
        self.emit_at(0)
    }
}

impl TsExpr {
    /// Emit an expression that starts on a line indented `indent` levels.
    /// Multi-line objects and block arrows close at that same level.
    pub fn emit_at(&self, indent: usize) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call {
                callee,
                type_args,
                args,
            } => {
                let type_args_str = if type_args.is_empty() {
                    String::new()
                } else {
                    format!("<{}>", join(type_args, ", "))
                };
                let args_str = args
                    .iter()
                    .map(|a| a.emit_at(indent))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}{}({})", callee.emit_at(indent), type_args_str, args_str)
            }
            TsExpr::Arrow { params, body } => {
                let params_str = join(params, ", ");
                match body {
                    ArrowBody::Expr(expr) => format!("({params_str}) => {}", expr.emit_at(indent)),
                    ArrowBody::Block(stmts) => {
                        let mut output = format!("({params_str}) => {{\n");
                        for stmt in stmts {
                            output.push_str(&stmt.emit_indented(indent + 1));
                        }
                        output.push_str(&format!("{}}}", "  ".repeat(indent)));
                        output
                    }
                }
            }
            TsExpr::Object { members, multiline } => {
                if members.is_empty() {
                    return "{}".to_string();
                }
                if *multiline {
                    let inner = "  ".repeat(indent + 1);
                    let mut output = "{\n".to_string();
                    for member in members {
                        output.push_str(&format!("{inner}{},\n", member.emit_at(indent + 1)));
                    }
                    output.push_str(&format!("{}}}", "  ".repeat(indent)));
                    output
                } else {
                    let parts: Vec<_> = members.iter().map(|m| m.emit_at(indent)).collect();
                    format!("{{ {} }}", parts.join(", "))
                }
            }
            TsExpr::Template(parts) => {
                let content: String = parts
                    .iter()
                    .map(|p| match p {
                        TemplatePart::Static(s) => s.clone(),
                        TemplatePart::Dynamic(e) => format!("${{{}}}", e.emit_at(indent)),
                    })
                    .collect();
                format!("`{content}`")
            }
            TsExpr::Await(expr) => format!("await {}", expr.emit_at(indent)),
            TsExpr::Void(expr) => format!("void {}", expr.emit_at(indent)),
            TsExpr::Array(items) => {
                let items_str = items
                    .iter()
                    .map(|i| i.emit_at(indent))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{items_str}]")
            }
            TsExpr::Raw(code) => code.clone(),
        }
    }
}

impl ObjectMember {
    fn emit_at(&self, indent: usize) -> String {
        match self {
            ObjectMember::Prop(key, value) => format!("{key}: {}", value.emit_at(indent)),
            ObjectMember::Spread(value) => format!("...{}", value.emit_at(indent)),
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        match &self.ty {
            Some(ty) => format!("{}{}: {}", self.name, opt, ty.emit()),
            None => format!("{}{}", self.name, opt),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            TsStmt::Const { name, init } => {
                format!("{prefix}const {name} = {};\n", init.emit_at(indent))
            }
            TsStmt::Expr(expr) => format!("{prefix}{};\n", expr.emit_at(indent)),
            TsStmt::Return(expr) => format!("{prefix}return {};\n", expr.emit_at(indent)),
            TsStmt::Comment(text) => format!("{prefix}// {text}\n"),
            TsStmt::Blank => "\n".to_string(),
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

impl Emit for TsFunction {
    fn emit(&self) -> String {
        let mut output = String::new();

        if let Some(doc) = &self.doc {
            output.push_str("/**\n");
            for line in doc.replace("*/", "*\\/").lines() {
                output.push_str(format!(" * {line}").trim_end());
                output.push('\n');
            }
            output.push_str(" */\n");
        }

        if self.is_export {
            output.push_str("export ");
        }
        if self.is_async {
            output.push_str("async ");
        }

        // One parameter per line
        if self.params.is_empty() {
            output.push_str(&format!("function {}()", self.name));
        } else {
            let params: Vec<_> = self.params.iter().map(|p| format!("  {}", p.emit())).collect();
            output.push_str(&format!("function {}(\n{}\n)", self.name, params.join(",\n")));
        }

        if let Some(ty) = &self.return_type {
            output.push_str(&format!(": {}", ty.emit()));
        }

        if self.body.is_empty() {
            output.push_str(" {}\n");
        } else {
            output.push_str(" {\n");
            for stmt in &self.body {
                output.push_str(&stmt.emit_indented(1));
            }
            output.push_str("}\n");
        }

        output
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for TsImport {
    fn emit(&self) -> String {
        match &self.clause {
            ImportClause::Named(items) => {
                format!("import {{ {} }} from '{}';\n", items.join(", "), self.from)
            }
            ImportClause::Namespace(alias) => {
                format!("import * as {} from '{}';\n", alias, self.from)
            }
        }
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        for line in &self.header {
            output.push_str(line);
            output.push('\n');
        }

        for import in &self.imports {
            output.push_str(&import.emit());
        }

        if !self.header.is_empty() || !self.imports.is_empty() {
            output.push('\n');
        }

        for type_def in &self.types {
            output.push_str(&type_def.emit());
            output.push('\n');
        }

        for func in &self.functions {
            output.push_str(&func.emit());
            output.push('\n');
        }

        for target in &self.reexports {
            output.push_str(&format!("export * from '{target}';\n"));
        }

        let trimmed = output.trim_end().len();
        output.truncate(trimmed);
        output.push('\n');
        output
    }
}

// =============================================================================
// Tests
// =============================================================================
