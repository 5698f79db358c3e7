//! AST type definitions shared by every stage of the `.elem` compiler
//! pipeline: the markup tree (§3 "Markup node"/"Attribute"), the script
//! tree (§3 "Script tree"), and the small value types the assembler and
//! code generator pass between each other.

pub mod markup;
pub mod script;
pub mod span;
pub mod var;

pub use markup::{
    Attribute, AttributeValue, Document, ElementNode, ExprSrc, ExpressionNode, LeafElementNode,
    MarkupNode, NodeId, TextNode,
};
pub use script::{
    BasicControlNode, BlockNode, ClassNode, CommentNode, DoWhileNode, FunctionNode, IfNode,
    LabelNode, ScriptNode, ScriptTree, TryCatchNode, VarDeclNode,
};
pub use span::Span;
pub use var::{NamedVar, VarInfo};
