use glam::Mat4;

use crate::stage::NodeHandle;
use crate::tokens::Symbol;

/// Identity of an authored attribute: the owning node plus the property
/// name.
///
/// Two `AttributeId`s are equal iff they denote the same property on the
/// same node. Binding keys compare attribute *identity*, never value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeId {
    /// The node the attribute is authored on.
    pub node: NodeHandle,
    /// The interned property name.
    pub name: Symbol,
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Integer array (joint indices).
    IntArray(Vec<i32>),
    /// Float array (joint weights).
    FloatArray(Vec<f32>),
    /// Token array (joint names, joint-order overrides).
    TokenArray(Vec<Symbol>),
    /// A single matrix (geometry bind transform).
    Matrix(Mat4),
    /// Matrix array (rest / bind pose transforms).
    MatrixArray(Vec<Mat4>),
}

impl AttrValue {
    /// The value as an integer array, if it is one.
    #[must_use]
    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Self::IntArray(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a float array, if it is one.
    #[must_use]
    pub fn as_float_array(&self) -> Option<&[f32]> {
        match self {
            Self::FloatArray(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a token array, if it is one.
    #[must_use]
    pub fn as_token_array(&self) -> Option<&[Symbol]> {
        match self {
            Self::TokenArray(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a single matrix, if it is one.
    #[must_use]
    pub fn as_matrix(&self) -> Option<Mat4> {
        match self {
            Self::Matrix(m) => Some(*m),
            _ => None,
        }
    }

    /// The value as a matrix array, if it is one.
    #[must_use]
    pub fn as_matrix_array(&self) -> Option<&[Mat4]> {
        match self {
            Self::MatrixArray(v) => Some(v),
            _ => None,
        }
    }
}
