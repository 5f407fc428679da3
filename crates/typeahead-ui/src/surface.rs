//! Host surface the widget is embedded in.

/// What the widget needs from whoever displays it.
pub trait Surface {
    /// Width available to the input, used to size the dropdown.
    fn input_width(&self) -> u16;

    /// Leave the widget for `link`.
    fn navigate(&mut self, link: &str);
}
