mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::DataLock;
use crate::io::prompt_log;
use crate::io::session::{HISTORY_FILE, Session};
use crate::io::store::{self, JsonFileStore};
use crate::io::uploads;
use crate::model::category::Category;
use crate::model::config::WeaverConfig;
use crate::model::project::Project;
use crate::model::workspace::Workspace;
use crate::ops::workspace_ops::SelectionChange;
use crate::ops::{selection_ops, template_ops, workspace_ops};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Validation failures reported to the user
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("no active project (create one with `pw project add <name>`)")]
    NoActiveProject,
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error("category not found: {0}")]
    CategoryNotFound(String),
    #[error("no term \"{text}\" in {category}")]
    TermNotFound { category: String, text: String },
    #[error("unknown term: {0}")]
    UnknownTerm(String),
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{category} already has a term \"{text}\"")]
    DuplicateTerm { category: String, text: String },
    #[error("refusing to delete all data without --yes")]
    NotConfirmed,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Data directory from `-C`, then `$WEAVER_DIR`, then `./.weaver`
pub fn resolve_data_dir(flag: Option<&str>) -> PathBuf {
    flag.map(PathBuf::from)
        .or_else(|| std::env::var_os("WEAVER_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(".weaver"))
}

pub fn dispatch(cli: Cli) -> CmdResult {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    tracing::debug!(dir = %data_dir.display(), "using data directory");

    if let Commands::Init(args) = cli.command {
        let _lock = DataLock::acquire_default(&data_dir)?;
        return cmd_init(&data_dir, args);
    }

    let mut ctx = Context::open(data_dir, cli.json)?;
    match cli.command {
        Commands::Init(_) => Ok(()),

        // Read commands
        Commands::Projects => cmd_projects(&ctx),
        Commands::Categories(scope) => cmd_categories(&ctx, scope),
        Commands::Terms(args) => cmd_terms(&ctx, args),
        Commands::Selection(SelectionCmd { action: None }) => cmd_selection_list(&ctx),
        Commands::Prompt(args) => cmd_prompt(&ctx, args),
        Commands::Log => cmd_log(&ctx),
        Commands::Templates => cmd_templates(&ctx),
        Commands::Status => cmd_status(&ctx),

        // Write commands
        Commands::Project(cmd) => cmd_project(&mut ctx, cmd.action),
        Commands::Category(cmd) => cmd_category(&mut ctx, cmd.scope, cmd.action),
        Commands::Term(cmd) => cmd_term(&mut ctx, cmd.scope, cmd.action),
        Commands::Select(args) => cmd_select(&mut ctx, args),
        Commands::Selection(SelectionCmd {
            action: Some(action),
        }) => cmd_selection(&mut ctx, action),
        Commands::Template(cmd) => cmd_template(&mut ctx, cmd.action),
        Commands::Undo => cmd_undo(&mut ctx),
        Commands::Redo => cmd_redo(&mut ctx),
        Commands::Save => cmd_save(&mut ctx),
        Commands::Export(arg) => cmd_export(&ctx, &arg.path),
        Commands::Import(arg) => cmd_import(&mut ctx, &arg.path),
        Commands::Upload(arg) => cmd_upload(&ctx, &arg.path),
        Commands::Image(arg) => cmd_image(&ctx, &arg.path),
        Commands::Clear(args) => cmd_clear(&mut ctx, args),
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// An open data directory: config, the session under undo, and the lock
/// held for the duration of the command.
struct Context {
    data_dir: PathBuf,
    config: WeaverConfig,
    json: bool,
    session: Session<JsonFileStore>,
    _lock: DataLock,
}

impl Context {
    fn open(data_dir: PathBuf, json: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let lock = DataLock::acquire_default(&data_dir)?;
        let config = config_io::read_config(&data_dir)?;
        let store = JsonFileStore::new(data_dir.join(&config.storage.data_file));
        let session = Session::open(
            store,
            data_dir.join(HISTORY_FILE),
            config.history.max,
            config.storage.autosave,
        )?;
        Ok(Context {
            data_dir,
            config,
            json,
            session,
            _lock: lock,
        })
    }

    fn ws(&self) -> &Workspace {
        self.session.workspace()
    }

    /// The project named by `--project`, or the active one
    fn project(&self, key: Option<&str>) -> Result<&Project, CommandError> {
        match key {
            Some(key) => self
                .ws()
                .resolve_project(key)
                .ok_or_else(|| CommandError::ProjectNotFound(key.to_string())),
            None => self.ws().active_project().ok_or(CommandError::NoActiveProject),
        }
    }

    fn category(&self, project_key: Option<&str>, key: &str) -> Result<(&Project, &Category), CommandError> {
        let project = self.project(project_key)?;
        let category = project
            .resolve_category(key)
            .ok_or_else(|| CommandError::CategoryNotFound(key.to_string()))?;
        Ok((project, category))
    }

    /// Commit `next` and report what happened
    fn commit(&mut self, next: Workspace, message: &str) -> CmdResult {
        if self.session.commit(next)? {
            tracing::info!("{}", message);
            println!("{}", message);
        } else {
            println!("No change");
        }
        Ok(())
    }

    fn upload_dir(&self) -> PathBuf {
        self.data_dir.join(&self.config.uploads.dir)
    }

    /// An `--image` value: an existing file is uploaded, anything else is
    /// kept as a URL.
    fn image(&self, arg: Option<String>) -> Result<Option<String>, Box<dyn std::error::Error>> {
        match arg {
            Some(value) if Path::new(&value).is_file() => {
                let url = uploads::store_upload(
                    &self.upload_dir(),
                    Path::new(&value),
                    Utc::now().timestamp_millis(),
                )?;
                Ok(Some(url))
            }
            Some(value) if value.trim().is_empty() => Ok(None),
            other => Ok(other),
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_selection_change(change: &SelectionChange) {
    for text in &change.removed {
        println!("  unselected \"{}\"", text);
    }
    for (old, new) in &change.renamed {
        println!("  selection \"{}\" -> \"{}\"", old, new);
    }
}

fn non_empty(value: &str, what: &'static str) -> Result<String, CommandError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CommandError::Empty(what));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_projects(ctx: &Context) -> CmdResult {
    let ws = ctx.ws();
    if ctx.json {
        let list: Vec<ProjectJson> = ws.projects.iter().map(|p| project_json(ws, p)).collect();
        return print_json(&list);
    }
    print!("{}", format_projects(ws));
    Ok(())
}

fn cmd_categories(ctx: &Context, scope: ProjectScope) -> CmdResult {
    let project = ctx.project(scope.project.as_deref())?;
    if ctx.json {
        let list: Vec<CategoryJson> = project.categories.iter().map(category_json).collect();
        return print_json(&list);
    }
    print!("{}", format_categories(project));
    Ok(())
}

fn cmd_terms(ctx: &Context, args: TermsArgs) -> CmdResult {
    let (_, category) = ctx.category(args.scope.project.as_deref(), &args.category)?;
    if ctx.json {
        return print_json(&term_jsons(ctx.ws(), category));
    }
    print!("{}", format_terms(ctx.ws(), category));
    Ok(())
}

fn cmd_selection_list(ctx: &Context) -> CmdResult {
    let selection = &ctx.ws().selected_terms;
    if ctx.json {
        return print_json(selection);
    }
    if selection.is_empty() {
        println!("Nothing selected");
    } else {
        print!("{}", format_selection(selection));
    }
    Ok(())
}

fn cmd_prompt(ctx: &Context, args: PromptArgs) -> CmdResult {
    let selection = &ctx.ws().selected_terms;
    let prompt = selection_ops::serialize_with(selection, &ctx.config.prompt.separator);

    if !args.no_log
        && prompt_log::record_prompt(
            &ctx.data_dir,
            &prompt,
            Utc::now(),
            ctx.config.prompt.log_limit,
        )?
    {
        tracing::debug!("recorded prompt in log");
    }

    if ctx.json {
        return print_json(&PromptJson {
            prompt,
            terms: selection,
        });
    }
    if prompt.is_empty() {
        eprintln!("Nothing selected (try `pw select <term>`)");
    } else {
        println!("{}", prompt);
    }
    Ok(())
}

fn cmd_log(ctx: &Context) -> CmdResult {
    let entries = prompt_log::read_prompt_log(&ctx.data_dir);
    if ctx.json {
        return print_json(&entries);
    }
    print!("{}", format_log(&entries));
    Ok(())
}

fn cmd_templates(ctx: &Context) -> CmdResult {
    let templates = &ctx.ws().templates;
    if ctx.json {
        return print_json(templates);
    }
    print!("{}", format_templates(templates));
    Ok(())
}

fn cmd_status(ctx: &Context) -> CmdResult {
    let history = ctx.session.history();
    let status = StatusJson {
        undo: history.past().len(),
        redo: history.future().len(),
        max_history: history.max_history(),
        selected: ctx.ws().selected_terms.len(),
        unsaved: ctx.session.is_dirty(),
    };
    if ctx.json {
        return print_json(&status);
    }
    println!(
        "undo: {}  redo: {}  (max {})  selected: {}",
        status.undo, status.redo, status.max_history, status.selected
    );
    if status.unsaved {
        println!("unsaved changes (run `pw save`)");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

fn cmd_project(ctx: &mut Context, action: ProjectAction) -> CmdResult {
    match action {
        ProjectAction::Add { name } => {
            let name = non_empty(&name, "project name")?;
            let (next, _) = workspace_ops::add_project(ctx.ws(), &name);
            ctx.commit(next, &format!("Added project {}", name))
        }
        ProjectAction::Rm { project } => {
            let p = ctx.project(Some(&project))?;
            let (id, name) = (p.id.clone(), p.name.clone());
            let (next, change) = workspace_ops::delete_project(ctx.ws(), &id);
            ctx.commit(next, &format!("Deleted project {}", name))?;
            report_selection_change(&change);
            Ok(())
        }
        ProjectAction::Rename { project, name } => {
            let name = non_empty(&name, "project name")?;
            let id = ctx.project(Some(&project))?.id.clone();
            let next = workspace_ops::rename_project(ctx.ws(), &id, &name);
            ctx.commit(next, &format!("Renamed project to {}", name))
        }
        ProjectAction::Use { project } => {
            let p = ctx.project(Some(&project))?;
            let (id, name) = (p.id.clone(), p.name.clone());
            let next = workspace_ops::set_active_project(ctx.ws(), &id);
            ctx.commit(next, &format!("Active project: {}", name))
        }
        ProjectAction::Mv { project, position } => {
            let id = ctx.project(Some(&project))?.id.clone();
            let from = ctx
                .ws()
                .projects
                .iter()
                .position(|p| p.id == id)
                .unwrap_or_default();
            let next = workspace_ops::reorder_projects(ctx.ws(), from, position);
            ctx.commit(next, &format!("Moved project to position {}", position))
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

fn cmd_category(ctx: &mut Context, scope: ProjectScope, action: CategoryAction) -> CmdResult {
    let project_key = scope.project.as_deref();
    match action {
        CategoryAction::Add { name } => {
            let name = non_empty(&name, "category name")?;
            let project_id = ctx.project(project_key)?.id.clone();
            let (next, _) = workspace_ops::add_category(ctx.ws(), &project_id, &name);
            ctx.commit(next, &format!("Added category {}", name))
        }
        CategoryAction::Rm { category } => {
            let (p, c) = ctx.category(project_key, &category)?;
            let (pid, cid, name) = (p.id.clone(), c.id.clone(), c.name.clone());
            let (next, change) = workspace_ops::delete_category(ctx.ws(), &pid, &cid);
            ctx.commit(next, &format!("Deleted category {}", name))?;
            report_selection_change(&change);
            Ok(())
        }
        CategoryAction::Rename { category, name } => {
            let name = non_empty(&name, "category name")?;
            let (p, c) = ctx.category(project_key, &category)?;
            let (pid, cid) = (p.id.clone(), c.id.clone());
            let next = workspace_ops::rename_category(ctx.ws(), &pid, &cid, &name);
            ctx.commit(next, &format!("Renamed category to {}", name))
        }
        CategoryAction::Mv { category, position } => {
            let (p, c) = ctx.category(project_key, &category)?;
            let (pid, cid) = (p.id.clone(), c.id.clone());
            let from = p
                .categories
                .iter()
                .position(|c| c.id == cid)
                .unwrap_or_default();
            let next = workspace_ops::reorder_categories(ctx.ws(), &pid, from, position);
            ctx.commit(next, &format!("Moved category to position {}", position))
        }
    }
}

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

fn cmd_term(ctx: &mut Context, scope: ProjectScope, action: TermAction) -> CmdResult {
    let project_key = scope.project.as_deref();
    match action {
        TermAction::Add {
            category,
            text,
            image,
        } => {
            let text = non_empty(&text, "term text")?;
            let (p, c) = ctx.category(project_key, &category)?;
            if c.contains_term(&text) {
                return Err(CommandError::DuplicateTerm {
                    category: c.name.clone(),
                    text,
                }
                .into());
            }
            let (pid, cid, name) = (p.id.clone(), c.id.clone(), c.name.clone());
            let image = ctx.image(image)?;
            let next = workspace_ops::add_term(ctx.ws(), &pid, &cid, &text, image);
            ctx.commit(next, &format!("Added \"{}\" to {}", text, name))
        }
        TermAction::Rm { category, text } => {
            let (p, c) = ctx.category(project_key, &category)?;
            if !c.contains_term(&text) {
                return Err(CommandError::TermNotFound {
                    category: c.name.clone(),
                    text,
                }
                .into());
            }
            let (pid, cid, name) = (p.id.clone(), c.id.clone(), c.name.clone());
            let (next, change) = workspace_ops::remove_term(ctx.ws(), &pid, &cid, &text);
            ctx.commit(next, &format!("Removed \"{}\" from {}", text, name))?;
            report_selection_change(&change);
            Ok(())
        }
        TermAction::Edit {
            category,
            old,
            new,
            image,
            clear_image,
        } => {
            let new = non_empty(&new, "term text")?;
            let (p, c) = ctx.category(project_key, &category)?;
            let Some(term) = c.find_term(&old) else {
                return Err(CommandError::TermNotFound {
                    category: c.name.clone(),
                    text: old,
                }
                .into());
            };
            if new != old && c.contains_term(&new) {
                return Err(CommandError::DuplicateTerm {
                    category: c.name.clone(),
                    text: new,
                }
                .into());
            }
            let (pid, cid) = (p.id.clone(), c.id.clone());
            let current_image = term.image.clone();
            let image = if clear_image {
                None
            } else if image.is_some() {
                ctx.image(image)?
            } else {
                current_image
            };
            let (next, change) = workspace_ops::edit_term(ctx.ws(), &pid, &cid, &old, &new, image);
            ctx.commit(next, &format!("Updated \"{}\"", new))?;
            report_selection_change(&change);
            Ok(())
        }
        TermAction::Mv { category, from, to } => {
            let (p, c) = ctx.category(project_key, &category)?;
            let (pid, cid) = (p.id.clone(), c.id.clone());
            let next = workspace_ops::reorder_terms(ctx.ws(), &pid, &cid, from, to);
            ctx.commit(next, &format!("Moved term {} to {}", from, to))
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

fn cmd_select(ctx: &mut Context, args: SelectArgs) -> CmdResult {
    let mut next = ctx.ws().clone();
    for text in &args.terms {
        if !next.is_selected(text) && !next.has_term_text(text) {
            return Err(CommandError::UnknownTerm(text.clone()).into());
        }
        next = workspace_ops::toggle_selection(&next, text);
    }
    let prompt = selection_ops::serialize_with(&next.selected_terms, &ctx.config.prompt.separator);
    ctx.commit(next, &format!("Prompt: {}", prompt))
}

fn cmd_selection(ctx: &mut Context, action: SelectionAction) -> CmdResult {
    match action {
        SelectionAction::Rm { text } => {
            let next = workspace_ops::remove_selection(ctx.ws(), &text);
            ctx.commit(next, &format!("Unselected \"{}\"", text))
        }
        SelectionAction::Mv { from, to } => {
            let next = workspace_ops::reorder_selection(ctx.ws(), from, to);
            ctx.commit(next, &format!("Moved selection {} to {}", from, to))
        }
        SelectionAction::Clear => {
            let next = workspace_ops::clear_selection(ctx.ws());
            ctx.commit(next, "Selection cleared")
        }
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

fn template_id(ws: &Workspace, key: &str) -> Result<String, CommandError> {
    ws.template(key)
        .or_else(|| ws.templates.iter().find(|t| t.name.eq_ignore_ascii_case(key)))
        .map(|t| t.id.clone())
        .ok_or_else(|| CommandError::TemplateNotFound(key.to_string()))
}

fn cmd_template(ctx: &mut Context, action: TemplateAction) -> CmdResult {
    match action {
        TemplateAction::Add { name, terms, image } => {
            let image = ctx.image(image)?;
            let (next, _) = template_ops::create_template(ctx.ws(), &name, &terms, image)?;
            ctx.commit(next, &format!("Saved template {}", name.trim()))
        }
        TemplateAction::Save { name } => {
            let csv = ctx.ws().selected_terms.join(",");
            let (next, _) = template_ops::create_template(ctx.ws(), &name, &csv, None)?;
            ctx.commit(next, &format!("Saved template {}", name.trim()))
        }
        TemplateAction::Rm { template } => {
            let id = template_id(ctx.ws(), &template)?;
            let next = template_ops::delete_template(ctx.ws(), &id);
            ctx.commit(next, &format!("Deleted template {}", template))
        }
        TemplateAction::Use { template } => {
            let id = template_id(ctx.ws(), &template)?;
            let next = template_ops::apply_template(ctx.ws(), &id)?;
            let prompt =
                selection_ops::serialize_with(&next.selected_terms, &ctx.config.prompt.separator);
            ctx.commit(next, &format!("Prompt: {}", prompt))
        }
    }
}

// ---------------------------------------------------------------------------
// History, storage, maintenance
// ---------------------------------------------------------------------------

fn cmd_undo(ctx: &mut Context) -> CmdResult {
    if ctx.session.undo()? {
        println!("Undone");
    } else {
        println!("Nothing to undo");
    }
    Ok(())
}

fn cmd_redo(ctx: &mut Context) -> CmdResult {
    if ctx.session.redo()? {
        println!("Redone");
    } else {
        println!("Nothing to redo");
    }
    Ok(())
}

fn cmd_save(ctx: &mut Context) -> CmdResult {
    ctx.session.save()?;
    println!("Saved");
    Ok(())
}

fn cmd_export(ctx: &Context, path: &str) -> CmdResult {
    store::write_export(Path::new(path), &ctx.ws().projects)?;
    println!("Exported {} projects to {}", ctx.ws().projects.len(), path);
    Ok(())
}

fn cmd_import(ctx: &mut Context, path: &str) -> CmdResult {
    let projects = store::read_import(Path::new(path))?;
    let count = projects.len();
    let (next, change) = workspace_ops::replace_projects(ctx.ws(), projects);
    ctx.commit(next, &format!("Imported {} projects", count))?;
    report_selection_change(&change);
    Ok(())
}

fn cmd_upload(ctx: &Context, path: &str) -> CmdResult {
    let url = uploads::store_upload(&ctx.upload_dir(), Path::new(path), Utc::now().timestamp_millis())?;
    println!("{}", url);
    Ok(())
}

fn cmd_image(ctx: &Context, url: &str) -> CmdResult {
    let path = uploads::resolve_upload(&ctx.upload_dir(), url)?;
    let content_type = uploads::content_type(&path);
    if ctx.json {
        return print_json(&ImageJson {
            path: path.display().to_string(),
            content_type,
        });
    }
    println!("{}  {}", path.display(), content_type);
    Ok(())
}

fn cmd_clear(ctx: &mut Context, args: ClearArgs) -> CmdResult {
    if !args.yes {
        return Err(CommandError::NotConfirmed.into());
    }
    let next = workspace_ops::clear_all(ctx.ws());
    ctx.commit(next, "All data cleared")
}
