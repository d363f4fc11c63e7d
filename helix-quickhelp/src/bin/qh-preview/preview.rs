//! Stand-ins for the editor: a one-candidate completion engine serving a
//! documentation file, and a surface that renders the popup as text.

use std::fmt::Write as _;

use helix_quickhelp::{
    Candidate, Capability, ChooseSource, CompletionEngine, DocBuffer, DocResponse, PopupStyle,
    RenderSurface, SurfaceError, SurfaceHandle,
};
use ropey::Rope;

/// Completion engine offering a single candidate whose doc buffer is a file.
pub struct FileEngine {
    candidates: Vec<Candidate>,
    text: Rope,
}

impl FileEngine {
    pub fn new(label: impl Into<String>, text: Rope) -> Self {
        Self {
            candidates: vec![Candidate::new(label, "file")],
            text,
        }
    }
}

impl CompletionEngine for FileEngine {
    fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    fn selection(&self) -> Option<usize> {
        Some(0)
    }

    fn invoke_capability(
        &mut self,
        candidate: &Candidate,
        capability: Capability,
        _chooser: &dyn ChooseSource,
    ) -> Option<DocResponse> {
        match capability {
            Capability::QuickhelpString => None,
            Capability::DocBuffer => {
                let label = candidate.label.clone();
                let buffer = DocBuffer::new(self.text.clone())
                    .on_release(move || log::trace!("released doc buffer for {label}"));
                Some(DocResponse::Buffer(buffer))
            }
        }
    }

    fn cancel_completion(&mut self) {
        log::debug!("completion cancelled");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Below(usize),
    Overlay,
}

/// Surface that keeps the popup as text for printing.
pub struct TextSurface {
    cursor_row: usize,
    height: usize,
    handle: Option<SurfaceHandle>,
    text: String,
    style: PopupStyle,
    placement: Option<Placement>,
    dedicated: bool,
}

impl TextSurface {
    pub fn new(cursor_row: usize, height: usize) -> Self {
        Self {
            cursor_row,
            height,
            handle: None,
            text: String::new(),
            style: PopupStyle::default(),
            placement: None,
            dedicated: false,
        }
    }

    /// The popup with a header describing its placement, or `None` when
    /// nothing is shown.
    pub fn render(&self) -> Option<String> {
        let placement = self.placement?;
        let mut out = String::new();
        let where_ = match placement {
            Placement::Below(rows) => format!("split below cursor, {rows} rows"),
            Placement::Overlay => "dedicated overlay".to_string(),
        };
        let _ = writeln!(out, "[{where_}{}]", if self.dedicated { ", dedicated" } else { "" });
        if let Some(fg) = &self.style.foreground {
            let _ = writeln!(out, "[foreground {fg}]");
        }
        if let Some(bg) = &self.style.background {
            let _ = writeln!(out, "[background {bg}]");
        }
        if self.style.styled_text {
            let _ = writeln!(out, "[styled text]");
        }
        let width = self.text.lines().map(str::len).max().unwrap_or(0);
        let rule = "-".repeat(width);
        let _ = writeln!(out, "{rule}\n{}\n{rule}", self.text);
        Some(out)
    }

    fn check(&self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        if self.handle == Some(handle) {
            Ok(())
        } else {
            Err(SurfaceError::Unavailable(format!("unknown surface {}", handle.0)))
        }
    }

    fn clear(&mut self) {
        self.handle = None;
        self.text.clear();
        self.placement = None;
        self.dedicated = false;
    }
}

impl RenderSurface for TextSurface {
    fn create_or_reuse(&mut self, _id: &str) -> Result<SurfaceHandle, SurfaceError> {
        Ok(*self.handle.get_or_insert(SurfaceHandle(1)))
    }

    fn write_text(&mut self, handle: SurfaceHandle, text: &str) -> Result<(), SurfaceError> {
        self.check(handle)?;
        self.text = text.to_string();
        Ok(())
    }

    fn apply_style(&mut self, handle: SurfaceHandle, style: &PopupStyle) -> Result<(), SurfaceError> {
        self.check(handle)?;
        self.style = style.clone();
        Ok(())
    }

    fn mark_dedicated(&mut self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        self.check(handle)?;
        self.dedicated = true;
        Ok(())
    }

    fn place_below_cursor(&mut self, handle: SurfaceHandle, rows: usize) -> Result<(), SurfaceError> {
        self.check(handle)?;
        self.placement = Some(Placement::Below(rows));
        Ok(())
    }

    fn place_as_dedicated_overlay(&mut self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        self.check(handle)?;
        self.placement = Some(Placement::Overlay);
        self.dedicated = true;
        Ok(())
    }

    fn destroy(&mut self, handle: SurfaceHandle) {
        if self.handle == Some(handle) {
            log::debug!("destroying popup split");
            self.clear();
        }
    }

    fn release(&mut self, handle: SurfaceHandle) {
        if self.handle == Some(handle) {
            log::debug!("releasing popup overlay");
            self.clear();
        }
    }

    fn cursor_screen_row(&self) -> usize {
        self.cursor_row
    }

    fn viewport_height(&self) -> usize {
        self.height
    }
}
