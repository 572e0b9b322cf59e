pub mod category_ops;
pub mod term_ops;
pub mod selection_ops;
pub mod workspace_ops;
pub mod template_ops;
