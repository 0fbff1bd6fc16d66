pub mod builder;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod node;
pub mod renderer;
pub mod token;
pub mod trim;

pub use builder::{TemplateBuilder, substitute};
pub use context::{DATABASE_ID_KEY, PARAMETER_OBJECT_KEY, RenderingContext};
pub use descriptor::ElementDescriptor;
pub use error::{Result, TemplateError};
pub use node::{BindNode, ChooseNode, ConditionalNode, LoopNode, TemplateNode};
pub use renderer::{LOOP_BINDING_PREFIX, Render, RenderedSql, loop_binding_name, render, render_with};
pub use token::{PLACEHOLDER_TOKENS, SUBSTITUTION_TOKENS, TokenParser};
pub use trim::TrimNode;
