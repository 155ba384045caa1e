pub mod image;
pub mod palette;
pub mod sessions;

pub use image::{__path_handle_image, handle_image};
pub use palette::{
    reset_palette, set_palette_color, SetColorRequest, __path_reset_palette,
    __path_set_palette_color,
};
pub use sessions::{
    create_session, delete_session, get_session, update_settings, CreateSessionParams,
    SessionResponse, UpdateSettingsRequest, __path_create_session, __path_delete_session,
    __path_get_session, __path_update_settings,
};
