use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pw", about = concat!("weaver v", env!("CARGO_PKG_VERSION"), " - build prompts from reusable terms"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (default: $WEAVER_DIR, then ./.weaver)
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a data directory with a config file and starter terms
    Init(InitArgs),
    /// List projects
    Projects,
    /// Project management
    Project(ProjectCmd),
    /// List categories of a project
    Categories(ProjectScope),
    /// Category management
    Category(CategoryCmd),
    /// List the terms of a category
    Terms(TermsArgs),
    /// Term management
    Term(TermCmd),
    /// Toggle terms in the selection
    Select(SelectArgs),
    /// Show or edit the selection
    Selection(SelectionCmd),
    /// Print the prompt built from the selection
    Prompt(PromptArgs),
    /// Show recently emitted prompts
    Log,
    /// List templates
    Templates,
    /// Template management
    Template(TemplateCmd),
    /// Undo the last change
    Undo,
    /// Redo the last undone change
    Redo,
    /// Show undo/redo state
    Status,
    /// Write the data file (needed when autosave is off)
    Save,
    /// Export all projects to a JSON file
    Export(PathArg),
    /// Replace all projects with those from a JSON file
    Import(PathArg),
    /// Copy an image into the uploads directory
    Upload(PathArg),
    /// Show the stored file behind an /uploads/ image URL
    Image(PathArg),
    /// Delete all projects and the selection
    Clear(ClearArgs),
}

// ---------------------------------------------------------------------------
// Shared args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectScope {
    /// Project id or name (default: the active project)
    #[arg(long, short = 'p', global = true)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct PathArg {
    pub path: String,
}

#[derive(Args)]
pub struct InitArgs {
    /// Start without the starter projects
    #[arg(long)]
    pub empty: bool,
    /// Overwrite an existing data file
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectCmd {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Add a project and make it active
    Add { name: String },
    /// Delete a project
    Rm { project: String },
    /// Rename a project
    Rename { project: String, name: String },
    /// Make a project the active one
    Use { project: String },
    /// Move a project to a position (0-based)
    Mv { project: String, position: usize },
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CategoryCmd {
    #[command(subcommand)]
    pub action: CategoryAction,
    #[command(flatten)]
    pub scope: ProjectScope,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Append a category
    Add { name: String },
    /// Delete a category and its terms
    Rm { category: String },
    /// Rename a category
    Rename { category: String, name: String },
    /// Move a category to a position (0-based)
    Mv { category: String, position: usize },
}

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TermsArgs {
    /// Category id or name
    pub category: String,
    #[command(flatten)]
    pub scope: ProjectScope,
}

#[derive(Args)]
pub struct TermCmd {
    #[command(subcommand)]
    pub action: TermAction,
    #[command(flatten)]
    pub scope: ProjectScope,
}

#[derive(Subcommand)]
pub enum TermAction {
    /// Append a term to a category
    Add {
        category: String,
        text: String,
        /// Image file to upload, or an image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a term (and drop it from the selection)
    Rm { category: String, text: String },
    /// Change a term's text and/or image in place
    Edit {
        category: String,
        old: String,
        new: String,
        /// Image file to upload, or an image URL (default: keep current)
        #[arg(long, conflicts_with = "clear_image")]
        image: Option<String>,
        /// Remove the term's image
        #[arg(long)]
        clear_image: bool,
    },
    /// Move a term from one position to another (0-based)
    Mv {
        category: String,
        from: usize,
        to: usize,
    },
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SelectArgs {
    /// Term texts to toggle, in order
    #[arg(required = true)]
    pub terms: Vec<String>,
}

#[derive(Args)]
pub struct SelectionCmd {
    #[command(subcommand)]
    pub action: Option<SelectionAction>,
}

#[derive(Subcommand)]
pub enum SelectionAction {
    /// Remove a term from the selection
    Rm { text: String },
    /// Move a selected term to another position (0-based)
    Mv { from: usize, to: usize },
    /// Empty the selection
    Clear,
}

#[derive(Args)]
pub struct PromptArgs {
    /// Don't record the prompt in the prompt log
    #[arg(long)]
    pub no_log: bool,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TemplateCmd {
    #[command(subcommand)]
    pub action: TemplateAction,
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// Save a template from a comma-separated term list
    Add {
        name: String,
        terms: String,
        /// Preview image file or URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Save the current selection as a template
    Save { name: String },
    /// Delete a template
    Rm { template: String },
    /// Replace the selection with a template's terms
    Use { template: String },
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deletion
    #[arg(long)]
    pub yes: bool,
}
