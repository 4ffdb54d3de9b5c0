//! Node tree and rendering.
//!
//! A parse produces a flat sequence of [`Node`]s; each renders to a string
//! against a [`Context`] (naming store plus restriction policy). Nodes are
//! never mutated after construction.

use envsubst_types::{CaseTransform, Restrictions, SubstError, SubstResult};
use std::fmt;

use crate::env::Env;

/// What a render pass reads from.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub env: &'a Env,
    pub restrictions: &'a Restrictions,
}

impl<'a> Context<'a> {
    pub fn new(env: &'a Env, restrictions: &'a Restrictions) -> Self {
        Self { env, restrictions }
    }

    fn is_set(&self, name: &str) -> bool {
        self.env.has(name)
    }

    fn is_set_non_empty(&self, name: &str) -> bool {
        self.env.lookup(name).is_some_and(|v| !v.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Operator
// ─────────────────────────────────────────────────────────────────────

/// Expansion operator of a substitution node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `${VAR-DEF}`: default when unset.
    Dash,
    /// `${VAR=DEF}`: default when unset. The store is not modified.
    Equals,
    /// `${VAR+ALT}`: alternate when set.
    Plus,
    /// `${VAR:-DEF}`: default when unset or empty.
    ColonDash,
    /// `${VAR:=DEF}`: default when unset or empty. The store is not modified.
    ColonEquals,
    /// `${VAR:+ALT}`: alternate when set and non-empty.
    ColonPlus,
    /// `${VAR^^}`, `${VAR,,}`
    Case(CaseTransform),
}

impl Operator {
    /// Operator spelling as written in the template.
    pub fn spelling(self) -> &'static str {
        match self {
            Self::Dash => "-",
            Self::Equals => "=",
            Self::Plus => "+",
            Self::ColonDash => ":-",
            Self::ColonEquals => ":=",
            Self::ColonPlus => ":+",
            Self::Case(t) => t.operator(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Nodes
// ─────────────────────────────────────────────────────────────────────

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(TextNode),
    Variable(VariableNode),
    Substitution(SubstitutionNode),
    /// An expansion whose nested default already failed while parsing.
    /// Rendering reports that failure; the rest of the template is unaffected.
    Failed(SubstError),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextNode { text: text.into() })
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(VariableNode::new(name))
    }

    /// Render this node to its output string.
    pub fn render(&self, ctx: &Context<'_>) -> SubstResult<String> {
        match self {
            Self::Text(node) => Ok(node.text.clone()),
            Self::Variable(node) => node.render(ctx),
            Self::Substitution(node) => node.render(ctx),
            Self::Failed(err) => Err(err.clone()),
        }
    }
}

/// Literal text; renders unconditionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub text: String,
}

/// A bare `$NAME` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableNode {
    pub name: String,
}

impl VariableNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Render as a bare reference; an unresolved one is kept as `$NAME`.
    pub fn render(&self, ctx: &Context<'_>) -> SubstResult<String> {
        self.resolve(ctx, || format!("${}", self.name))
    }

    /// Render inside a `${...}`; an unresolved one is kept as `${NAME}`.
    pub fn render_braced(&self, ctx: &Context<'_>) -> SubstResult<String> {
        self.resolve(ctx, || format!("${{{}}}", self.name))
    }

    fn resolve(&self, ctx: &Context<'_>, verbatim: impl FnOnce() -> String) -> SubstResult<String> {
        let restrict = ctx.restrictions;
        match ctx.env.lookup(&self.name) {
            None if restrict.keep_unset => Ok(verbatim()),
            None if restrict.no_unset => Err(SubstError::unset(&self.name)),
            None => Ok(String::new()),
            Some("") if restrict.no_empty => Err(SubstError::empty(&self.name)),
            Some(value) => Ok(value.to_string()),
        }
    }
}

/// A `${NAME<op><default>}` expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionNode {
    /// `None` for a plain `${NAME}`.
    pub operator: Option<Operator>,
    pub variable: VariableNode,
    /// Default or alternate value; `None` renders as the empty string.
    pub default: Option<Box<Node>>,
}

impl SubstitutionNode {
    pub fn new(variable: VariableNode, operator: Option<Operator>, default: Option<Node>) -> Self {
        Self {
            operator,
            variable,
            default: default.map(Box::new),
        }
    }

    pub fn render(&self, ctx: &Context<'_>) -> SubstResult<String> {
        let name = self.variable.name.as_str();

        let Some(operator) = self.operator else {
            return self.variable.render_braced(ctx);
        };

        // Default and alternate branches are decided before keep_unset applies.
        let take_default = match operator {
            Operator::Case(transform) => {
                if ctx.restrictions.keep_unset && !ctx.is_set(name) {
                    return Ok(format!("${{{name}{}}}", transform.operator()));
                }
                let value = self.variable.render_braced(ctx)?;
                return Ok(transform.apply(&value));
            }
            Operator::Plus => {
                if !ctx.is_set(name) {
                    return Ok(String::new());
                }
                true
            }
            Operator::ColonPlus => {
                if !ctx.is_set_non_empty(name) {
                    return Ok(String::new());
                }
                true
            }
            Operator::Dash | Operator::Equals => !ctx.is_set(name),
            Operator::ColonDash | Operator::ColonEquals => !ctx.is_set_non_empty(name),
        };

        if take_default {
            tracing::trace!(name, operator = %operator, "default branch");
            return self.render_default(ctx);
        }
        self.variable.render_braced(ctx)
    }

    fn render_default(&self, ctx: &Context<'_>) -> SubstResult<String> {
        match &self.default {
            Some(node) => node.render(ctx),
            None => Ok(String::new()),
        }
    }
}
