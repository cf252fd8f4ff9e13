//! Rotation angles, either concrete or symbolic.
//!
//! Feature-encoding circuits are built once as templates where each input
//! feature is a named symbol, then bound to a sample's values before they
//! are executed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::f64::consts::PI;
use std::fmt;
use std::ops;

/// An angle expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A concrete value in radians.
    Constant(f64),
    /// A named feature slot.
    Symbol(String),
    /// π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Sum.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Difference.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Product.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Quotient.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// A concrete angle.
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    /// A named symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// π.
    pub fn pi() -> Self {
        Self::Pi
    }

    /// Children of a composite node, left to right.
    fn operands(&self) -> Vec<&ParameterExpression> {
        match self {
            Self::Constant(_) | Self::Symbol(_) | Self::Pi => vec![],
            Self::Neg(e) => vec![e.as_ref()],
            Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
                vec![a.as_ref(), b.as_ref()]
            }
        }
    }

    /// Rebuild the tree, replacing each leaf with `leaf(self)`.
    fn map_leaves(&self, leaf: &impl Fn(&ParameterExpression) -> ParameterExpression) -> Self {
        let map = |e: &ParameterExpression| Box::new(e.map_leaves(leaf));
        match self {
            Self::Constant(_) | Self::Symbol(_) | Self::Pi => leaf(self),
            Self::Neg(e) => Self::Neg(map(e)),
            Self::Add(a, b) => Self::Add(map(a), map(b)),
            Self::Sub(a, b) => Self::Sub(map(a), map(b)),
            Self::Mul(a, b) => Self::Mul(map(a), map(b)),
            Self::Div(a, b) => Self::Div(map(a), map(b)),
        }
    }

    /// Whether any symbol remains in the tree.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbol(_)) || self.operands().into_iter().any(Self::is_symbolic)
    }

    /// Evaluate to radians. `None` when a symbol is unbound or a divisor is zero.
    pub fn as_f64(&self) -> Option<f64> {
        Some(match self {
            Self::Constant(v) => *v,
            Self::Symbol(_) => return None,
            Self::Pi => PI,
            Self::Neg(e) => -e.as_f64()?,
            Self::Add(a, b) => a.as_f64()? + b.as_f64()?,
            Self::Sub(a, b) => a.as_f64()? - b.as_f64()?,
            Self::Mul(a, b) => a.as_f64()? * b.as_f64()?,
            Self::Div(a, b) => {
                let divisor = b.as_f64()?;
                if divisor == 0.0 {
                    return None;
                }
                a.as_f64()? / divisor
            }
        })
    }

    /// Names of all symbols, sorted.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            if let Self::Symbol(name) = expr {
                names.insert(name.clone());
            }
            stack.extend(expr.operands());
        }
        names
    }

    /// Replace one symbol with a value.
    pub fn bind(&self, name: &str, value: f64) -> Self {
        self.map_leaves(&|leaf| match leaf {
            Self::Symbol(n) if n == name => Self::Constant(value),
            other => other.clone(),
        })
    }

    /// Replace every symbol found in `values`, then fold constants.
    ///
    /// Symbols missing from `values` stay symbolic.
    pub fn bind_all(&self, values: &HashMap<String, f64>) -> Self {
        self.map_leaves(&|leaf| match leaf {
            Self::Symbol(n) => values
                .get(n)
                .map_or_else(|| leaf.clone(), |v| Self::Constant(*v)),
            other => other.clone(),
        })
        .simplify()
    }

    /// Collapse the tree to a constant when it has no free symbols.
    pub fn simplify(&self) -> Self {
        match self.as_f64() {
            Some(v) => Self::Constant(v),
            None => self.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{v}"),
            Self::Symbol(name) => write!(f, "{name}"),
            Self::Pi => write!(f, "π"),
            Self::Neg(e) => write!(f, "-({e})"),
            Self::Add(a, b) => write!(f, "({a} + {b})"),
            Self::Sub(a, b) => write!(f, "({a} - {b})"),
            Self::Mul(a, b) => write!(f, "({a} * {b})"),
            Self::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<&str> for ParameterExpression {
    fn from(name: &str) -> Self {
        Self::Symbol(name.to_string())
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl ops::$trait for ParameterExpression {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self::$variant(Box::new(self), Box::new(rhs))
            }
        }

        impl ops::$trait<f64> for ParameterExpression {
            type Output = Self;

            fn $method(self, rhs: f64) -> Self {
                Self::$variant(Box::new(self), Box::new(Self::Constant(rhs)))
            }
        }
    };
}

binary_op!(Add, add, Add);
binary_op!(Sub, sub, Sub);
binary_op!(Mul, mul, Mul);
binary_op!(Div, div, Div);

impl ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self {
        Self::Neg(Box::new(self))
    }
}
