use todo_client_core::TodoSync;

/// Message shown under the login/register forms until the next navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FormNotice {
    pub(crate) message: String,
}

/// The todo page's synchronizer, tied to the token it was mounted with,
/// plus the new-todo title typed so far. Dropped when the page is left or
/// the token changes.
pub(crate) struct MountedTodos<T> {
    pub(crate) token: String,
    pub(crate) sync: TodoSync<T>,
    pub(crate) new_title: String,
}
