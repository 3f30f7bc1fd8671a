pub mod mangahindisub;

pub use mangahindisub::MangaHindiSubClient;
