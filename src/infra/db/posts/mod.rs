macro_rules! post_columns {
    () => {
        "id, title, content, tags, created_at, updated_at"
    };
}

mod read;
mod types;
mod write;

pub(crate) use types::PostRow;

pub(crate) const POST_COLUMNS: &str = post_columns!();
