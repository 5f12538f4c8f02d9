pub mod wallpapers;

pub use wallpapers::SqlWallpaperRepository;
