use arboard::Clipboard;
use color_eyre::Result;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

pub struct ClipboardService {
    clipboard: Option<Clipboard>,
}

impl ClipboardService {
    pub fn new() -> Self {
        Self {
            clipboard: Clipboard::new().ok(),
        }
    }

    pub fn copy_text(&mut self, text: &str) -> Result<()> {
        let clipboard = self.get_clipboard()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }

    /// Clipboard image re-encoded as PNG
    pub fn read_image_png(&mut self) -> Result<Vec<u8>> {
        let clipboard = self.get_clipboard()?;
        let data = clipboard.get_image()?;
        let width = u32::try_from(data.width)?;
        let height = u32::try_from(data.height)?;
        let rgba = RgbaImage::from_raw(width, height, data.bytes.into_owned())
            .ok_or_else(|| color_eyre::eyre::eyre!("Clipboard image has an unexpected size"))?;
        let mut png = Cursor::new(Vec::new());
        rgba.write_to(&mut png, ImageFormat::Png)?;
        Ok(png.into_inner())
    }

    fn get_clipboard(&mut self) -> Result<&mut Clipboard> {
        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new()?);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| color_eyre::eyre::eyre!("Clipboard unavailable"))
    }
}
