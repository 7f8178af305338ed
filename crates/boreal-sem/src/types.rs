//! The synthesised type tag carried on the attribute stack (spec's Data
//! Model "Attributes": `"integer" | "logical" | "string" | "type_ok" |
//! "type_error" | ""`), plus the parameter-signature shape headers build up
//! while their `ParamList` is parsed.

use boreal_symtab::DataType;
use boreal_util::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TypeTag {
    /// The `""` tag: no type synthesised (grammar-only non-terminals like
    /// `DeclList`/`StmtList` carry this).
    #[default]
    None,
    Integer,
    Logical,
    Str,
    /// An operator/assignment/call whose operands matched; carries no
    /// scalar type of its own.
    TypeOk,
    /// A mismatch already diagnosed once; suppresses further "expected X,
    /// got Y" messages for the same operand (spec 4.4(4) and 4.4 closing
    /// paragraph).
    TypeError,
}

impl TypeTag {
    pub fn from_data_type(dt: DataType) -> TypeTag {
        match dt {
            DataType::Integer => TypeTag::Integer,
            DataType::Boolean => TypeTag::Logical,
            DataType::String => TypeTag::Str,
            DataType::Void => TypeTag::None,
        }
    }

    pub fn to_data_type(self) -> Option<DataType> {
        match self {
            TypeTag::Integer => Some(DataType::Integer),
            TypeTag::Logical => Some(DataType::Boolean),
            TypeTag::Str => Some(DataType::String),
            _ => None,
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, TypeTag::TypeError)
    }

    pub fn display(self) -> &'static str {
        match self {
            TypeTag::None => "",
            TypeTag::Integer => "integer",
            TypeTag::Logical => "logical",
            TypeTag::Str => "string",
            TypeTag::TypeOk => "ok",
            TypeTag::TypeError => "type_error",
        }
    }
}

/// One synthesised parameter, built up by `ParamList`/`Param` actions and
/// attached to a procedure/function's `Symbol` once its header completes
/// (spec 4.4(3)).
#[derive(Clone, Debug)]
pub struct ParamSig {
    pub name: String,
    pub ty: TypeTag,
    pub by_reference: bool,
    pub span: Span,
}
