//! View state and the event reducer.
//!
//! Every input (a keystroke updating the query, a selection, a sort
//! toggle, a reset) becomes an explicit `ViewEvent`; `reduce` maps
//! (state, event) to the next state. Pure and decoupled from rendering.

/// Column to sort the table by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
    Category,
    User,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "id" => Some(Self::Id),
            "name" | "product" => Some(Self::Name),
            "category" => Some(Self::Category),
            "user" | "owner" => Some(Self::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Category => "category",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// The whole mutable session state: the live query and the current
/// selections. Owned by the presentation layer, updated only through
/// `reduce`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub selected_user: Option<u32>,
    pub selected_category: Option<u32>,
    pub sort: Option<(SortKey, SortDir)>,
}

/// A discrete input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SetQuery(String),
    ClearQuery,
    SelectUser(u32),
    AllUsers,
    SelectCategory(u32),
    AllCategories,
    /// Cycles the named column: unsorted -> ascending -> descending ->
    /// unsorted. Switching columns starts ascending again.
    SortBy(SortKey),
    /// Clears the query and every selection.
    Reset,
}

/// Apply one event to the state, producing the next state. Each event
/// touches exactly the fields it names and nothing else.
pub fn reduce(state: &ViewState, event: &ViewEvent) -> ViewState {
    let mut next = state.clone();
    match event {
        ViewEvent::SetQuery(query) => next.query = query.clone(),
        ViewEvent::ClearQuery => next.query.clear(),
        ViewEvent::SelectUser(id) => next.selected_user = Some(*id),
        ViewEvent::AllUsers => next.selected_user = None,
        ViewEvent::SelectCategory(id) => next.selected_category = Some(*id),
        ViewEvent::AllCategories => next.selected_category = None,
        ViewEvent::SortBy(key) => {
            next.sort = match state.sort {
                Some((current, SortDir::Asc)) if current == *key => Some((*key, SortDir::Desc)),
                Some((current, SortDir::Desc)) if current == *key => None,
                _ => Some((*key, SortDir::Asc)),
            };
        }
        ViewEvent::Reset => next = ViewState::default(),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear_query() {
        let state = ViewState::default();
        let state = reduce(&state, &ViewEvent::SetQuery("apple".to_string()));
        assert_eq!(state.query, "apple");

        let state = reduce(&state, &ViewEvent::ClearQuery);
        assert!(state.query.is_empty());
    }

    #[test]
    fn test_select_user_leaves_other_fields_alone() {
        let mut state = ViewState::default();
        state.query = "tea".to_string();
        state.selected_category = Some(2);

        let next = reduce(&state, &ViewEvent::SelectUser(3));
        assert_eq!(next.selected_user, Some(3));
        assert_eq!(next.query, "tea");
        assert_eq!(next.selected_category, Some(2));
    }

    #[test]
    fn test_all_users_clears_selection() {
        let mut state = ViewState::default();
        state.selected_user = Some(1);
        let next = reduce(&state, &ViewEvent::AllUsers);
        assert_eq!(next.selected_user, None);
    }

    #[test]
    fn test_select_category_and_all_categories() {
        let state = reduce(&ViewState::default(), &ViewEvent::SelectCategory(4));
        assert_eq!(state.selected_category, Some(4));
        let state = reduce(&state, &ViewEvent::AllCategories);
        assert_eq!(state.selected_category, None);
    }

    #[test]
    fn test_sort_cycles_asc_desc_off() {
        let state = ViewState::default();
        let state = reduce(&state, &ViewEvent::SortBy(SortKey::Name));
        assert_eq!(state.sort, Some((SortKey::Name, SortDir::Asc)));

        let state = reduce(&state, &ViewEvent::SortBy(SortKey::Name));
        assert_eq!(state.sort, Some((SortKey::Name, SortDir::Desc)));

        let state = reduce(&state, &ViewEvent::SortBy(SortKey::Name));
        assert_eq!(state.sort, None);
    }

    #[test]
    fn test_sort_switching_column_restarts_ascending() {
        let mut state = ViewState::default();
        state.sort = Some((SortKey::Name, SortDir::Desc));
        let next = reduce(&state, &ViewEvent::SortBy(SortKey::Id));
        assert_eq!(next.sort, Some((SortKey::Id, SortDir::Asc)));
    }

    #[test]
    fn test_reset_returns_default_state() {
        let state = ViewState {
            query: "apple".to_string(),
            selected_user: Some(1),
            selected_category: Some(2),
            sort: Some((SortKey::User, SortDir::Desc)),
        };
        assert_eq!(reduce(&state, &ViewEvent::Reset), ViewState::default());
    }

    #[test]
    fn test_reduce_does_not_mutate_input() {
        let state = ViewState {
            query: "tea".to_string(),
            ..ViewState::default()
        };
        let before = state.clone();
        let _ = reduce(&state, &ViewEvent::SelectUser(1));
        assert_eq!(state, before);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("NAME"), Some(SortKey::Name));
        assert_eq!(SortKey::parse("product"), Some(SortKey::Name));
        assert_eq!(SortKey::parse("owner"), Some(SortKey::User));
        assert_eq!(SortKey::parse("price"), None);
    }
}
