use crate::{
    config::Config,
    model::Catalog,
    prepare::PreparedCategory,
    render,
    rows::{visible_rows, Row},
    session::SessionLog,
    state::{reduce, SortDir, SortKey, ViewEvent, ViewState},
    Args,
};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::RefCell;

pub struct Context<'a> {
    pub args: Args,
    pub config: Config,
    pub catalog: &'a Catalog,
    pub prepared: Vec<PreparedCategory<'a>>,
    pub session_id: String,
    pub state: RefCell<ViewState>,
    pub session: RefCell<Option<SessionLog>>,
}

/// Parse "key" or "key:dir" into a sort setting.
pub fn parse_sort(s: &str) -> Option<(SortKey, SortDir)> {
    let (key, dir) = match s.split_once(':') {
        Some((key, dir)) => (key, dir),
        None => (s, "asc"),
    };
    let key = SortKey::parse(key.trim())?;
    let dir = match dir.trim().to_lowercase().as_str() {
        "asc" => SortDir::Asc,
        "desc" => SortDir::Desc,
        _ => return None,
    };
    Some((key, dir))
}

/// Resolve a user argument, either an id or a (case-insensitive) name.
pub fn resolve_user(catalog: &Catalog, arg: &str) -> Option<u32> {
    if let Ok(id) = arg.parse::<u32>() {
        if catalog.user(id).is_some() {
            return Some(id);
        }
    }
    catalog
        .users
        .iter()
        .find(|u| u.name.eq_ignore_ascii_case(arg))
        .map(|u| u.id)
}

/// Resolve a category argument, either an id or a title.
pub fn resolve_category(catalog: &Catalog, arg: &str) -> Option<u32> {
    if let Ok(id) = arg.parse::<u32>() {
        if catalog.category(id).is_some() {
            return Some(id);
        }
    }
    catalog
        .categories
        .iter()
        .find(|c| c.title.eq_ignore_ascii_case(arg))
        .map(|c| c.id)
}

fn current_rows<'a>(ctx: &Context<'a>) -> Vec<Row<'a>> {
    visible_rows(ctx.catalog, &ctx.prepared, &ctx.state.borrow())
}

fn print_table(ctx: &Context) {
    let rows = current_rows(ctx);
    print!("{}", render::render_table(&rows, &ctx.config.table));
}

/// Run one event through the reducer, then trace and log it.
fn apply(ctx: &Context, event: ViewEvent) {
    let next = reduce(&ctx.state.borrow(), &event);
    *ctx.state.borrow_mut() = next;

    let visible = current_rows(ctx).len();
    if ctx.args.verbose {
        eprintln!("[trace] {:?} -> {} rows", event, visible);
    }

    if let Some(log) = ctx.session.borrow_mut().as_mut() {
        let result = match &event {
            ViewEvent::SetQuery(query) => log.query_changed(query, visible),
            ViewEvent::ClearQuery => log.query_changed("", visible),
            ViewEvent::SelectUser(id) => log.user_selected(Some(*id), visible),
            ViewEvent::AllUsers => log.user_selected(None, visible),
            ViewEvent::SelectCategory(id) => log.category_selected(Some(*id), visible),
            ViewEvent::AllCategories => log.category_selected(None, visible),
            ViewEvent::SortBy(_) => log.sort_changed(ctx.state.borrow().sort),
            ViewEvent::Reset => log.reset(),
        };
        if let Err(e) = result {
            eprintln!("Warning: failed to write session log: {}", e);
        }
    }
}

pub fn run_once(ctx: &Context) -> Result<()> {
    let rows = current_rows(ctx);

    if let Some(log) = ctx.session.borrow_mut().as_mut() {
        let query = ctx.state.borrow().query.clone();
        if let Err(e) = log.one_shot(&query, rows.len()) {
            eprintln!("Warning: failed to write session log: {}", e);
        }
    }

    if ctx.args.json {
        println!("{}", render::render_json(&rows)?);
    } else {
        print!("{}", render::render_table(&rows, &ctx.config.table));
    }
    Ok(())
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("shelf - type a search query, /help for commands, /exit to quit");
    print_table(&ctx);

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if line.starts_with('/') {
                    if handle_command(&ctx, line) {
                        break;
                    }
                    continue;
                }

                apply(&ctx, ViewEvent::SetQuery(line.to_string()));
                print_table(&ctx);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn handle_command(ctx: &Context, cmd: &str) -> bool {
    let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
    match parts[0] {
        "/exit" | "/quit" => return true,
        "/help" => {
            println!("Commands:");
            println!("  /exit                - quit");
            println!("  /help                - show commands");
            println!("  /show                - print the current table");
            println!("  /json                - print the current rows as JSON");
            println!("  /users               - list users");
            println!("  /categories          - list categories");
            println!("  /user <id|name>      - keep only products of categories owned by the user");
            println!("  /user all            - drop the user filter");
            println!("  /category <id|title> - keep only products of the category");
            println!("  /category all        - drop the category filter");
            println!("  /sort <key>          - sort by id, name, category or user;");
            println!("                         repeat to flip direction, a third time turns it off");
            println!("  /clear               - clear the search query");
            println!("  /reset               - reset all filters");
            println!("  /session             - show session info");
            println!("Anything else becomes the live search query.");
        }
        "/show" => print_table(ctx),
        "/json" => {
            let rows = current_rows(ctx);
            match render::render_json(&rows) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        "/users" => {
            let selected = ctx.state.borrow().selected_user;
            println!("Users:");
            for user in &ctx.catalog.users {
                let marker = if selected == Some(user.id) { " *" } else { "" };
                println!("  {}: {} ({}){}", user.id, user.name, user.sex, marker);
            }
        }
        "/categories" => {
            let selected = ctx.state.borrow().selected_category;
            println!("Categories:");
            for pc in &ctx.prepared {
                let owner = pc.user.map(|u| u.name.as_str()).unwrap_or("-");
                let marker = if selected == Some(pc.category.id) {
                    " *"
                } else {
                    ""
                };
                println!(
                    "  {}: {} - {} (owner: {}, {} products){}",
                    pc.category.id,
                    pc.category.icon,
                    pc.category.title,
                    owner,
                    pc.products.len(),
                    marker
                );
            }
        }
        "/user" => {
            if parts.len() > 1 {
                let arg = parts[1].trim();
                if arg.eq_ignore_ascii_case("all") {
                    apply(ctx, ViewEvent::AllUsers);
                    print_table(ctx);
                } else if let Some(id) = resolve_user(ctx.catalog, arg) {
                    apply(ctx, ViewEvent::SelectUser(id));
                    print_table(ctx);
                } else {
                    println!("Unknown user: {}. Use /users to list.", arg);
                }
            } else {
                match ctx.state.borrow().selected_user {
                    Some(id) => {
                        let name = ctx.catalog.user(id).map(|u| u.name.as_str()).unwrap_or("?");
                        println!("Selected user: {} ({})", name, id);
                    }
                    None => println!("No user filter (all users)"),
                }
            }
        }
        "/category" => {
            if parts.len() > 1 {
                let arg = parts[1].trim();
                if arg.eq_ignore_ascii_case("all") {
                    apply(ctx, ViewEvent::AllCategories);
                    print_table(ctx);
                } else if let Some(id) = resolve_category(ctx.catalog, arg) {
                    apply(ctx, ViewEvent::SelectCategory(id));
                    print_table(ctx);
                } else {
                    println!("Unknown category: {}. Use /categories to list.", arg);
                }
            } else {
                match ctx.state.borrow().selected_category {
                    Some(id) => {
                        let title = ctx
                            .catalog
                            .category(id)
                            .map(|c| c.title.as_str())
                            .unwrap_or("?");
                        println!("Selected category: {} ({})", title, id);
                    }
                    None => println!("No category filter (all categories)"),
                }
            }
        }
        "/sort" => {
            if parts.len() > 1 {
                let arg = parts[1].trim();
                match SortKey::parse(arg) {
                    Some(key) => {
                        apply(ctx, ViewEvent::SortBy(key));
                        print_sort(ctx);
                        print_table(ctx);
                    }
                    None => println!("Unknown sort key: {}. Use: id, name, category, user", arg),
                }
            } else {
                print_sort(ctx);
            }
        }
        "/clear" => {
            apply(ctx, ViewEvent::ClearQuery);
            print_table(ctx);
        }
        "/reset" => {
            apply(ctx, ViewEvent::Reset);
            print_table(ctx);
        }
        "/session" => {
            println!("Session: {}", ctx.session_id);
            match ctx.session.borrow().as_ref() {
                Some(log) => println!("Log: {:?}", log.path),
                None => println!("Log: disabled"),
            }
        }
        _ => println!("Unknown command: {}", parts[0]),
    }
    false
}

fn print_sort(ctx: &Context) {
    match ctx.state.borrow().sort {
        Some((key, dir)) => println!("Sort: {} {}", key.as_str(), dir.as_str()),
        None => println!("Sort: off"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        serde_json::from_value(serde_json::json!({
            "users": [
                { "id": 1, "name": "Roma", "sex": "m" },
                { "id": 2, "name": "Anna", "sex": "f" },
            ],
            "categories": [
                { "id": 1, "title": "Fruits", "icon": "🍏", "ownerId": 2 },
            ],
            "products": [],
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_user_by_id_and_name() {
        let cat = catalog();
        assert_eq!(resolve_user(&cat, "1"), Some(1));
        assert_eq!(resolve_user(&cat, "anna"), Some(2));
        assert_eq!(resolve_user(&cat, "ANNA"), Some(2));
        assert_eq!(resolve_user(&cat, "3"), None);
        assert_eq!(resolve_user(&cat, "Bob"), None);
    }

    #[test]
    fn test_resolve_category_by_id_and_title() {
        let cat = catalog();
        assert_eq!(resolve_category(&cat, "1"), Some(1));
        assert_eq!(resolve_category(&cat, "fruits"), Some(1));
        assert_eq!(resolve_category(&cat, "2"), None);
        assert_eq!(resolve_category(&cat, "Drinks"), None);
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("name"), Some((SortKey::Name, SortDir::Asc)));
        assert_eq!(parse_sort("id:desc"), Some((SortKey::Id, SortDir::Desc)));
        assert_eq!(parse_sort("user:ASC"), Some((SortKey::User, SortDir::Asc)));
        assert_eq!(parse_sort("price"), None);
        assert_eq!(parse_sort("name:down"), None);
    }
}
