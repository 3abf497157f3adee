use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a view stored in the [`Ui`](crate::Ui) arena.
    pub struct ViewId;
}

new_key_type! {
    /// Opaque identifier for a font in the [`Fonts`](crate::Fonts) registry.
    pub struct FontId;
}
