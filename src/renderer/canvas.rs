//! Canvas2D presenter
//!
//! Paints a [`DrawList`] on an HTML canvas. Sprites come from the sheet
//! image when it has loaded; until then they are drawn as solid blocks.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::draw::{DrawCommand, DrawList, css_color};
use crate::assets::SpriteAtlas;
use crate::config::GameConfig;

/// Sprite sheet image plus the atlas describing it
struct Sheet {
    atlas: SpriteAtlas,
    image: HtmlImageElement,
}

pub struct CanvasPresenter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    config: GameConfig,
    sheet: Option<Sheet>,
}

impl CanvasPresenter {
    pub fn new(canvas: HtmlCanvasElement, config: GameConfig) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.set_image_smoothing_enabled(false);
        Ok(Self {
            canvas,
            ctx,
            config,
            sheet: None,
        })
    }

    /// Start loading the sheet image named by `atlas`
    pub fn load_sheet(&mut self, atlas: SpriteAtlas, url: &str) -> Result<(), JsValue> {
        let image = HtmlImageElement::new()?;
        image.set_src(url);
        self.sheet = Some(Sheet { atlas, image });
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.ctx.set_image_smoothing_enabled(false);
    }

    pub fn draw(&self, list: &DrawList) {
        let ctx = &self.ctx;
        let (ox, oy) = (list.origin.x as f64, list.origin.y as f64);

        ctx.set_fill_style_str(&css_color(self.config.view.background_color));
        ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );

        ctx.save();
        ctx.translate(ox, oy).ok();

        // Backdrop behind the game area
        ctx.set_fill_style_str(&css_color(self.config.colors.primary_background));
        ctx.fill_rect(
            (-self.config.width / 2.0) as f64,
            (-self.config.height / 2.0) as f64,
            self.config.width as f64,
            self.config.height as f64,
        );

        if let Some(clip) = list.clip {
            ctx.begin_path();
            ctx.rect(clip.x as f64, clip.y as f64, clip.width as f64, clip.height as f64);
            ctx.clip();
        }

        for command in &list.commands {
            match command {
                DrawCommand::Rect { rect, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
                }
                DrawCommand::Sprite { rect, frame, tint } => {
                    if !self.draw_frame(frame, rect.x, rect.y, rect.width, rect.height) {
                        ctx.set_fill_style_str(&css_color(*tint));
                        ctx.fill_rect(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
                    }
                }
                DrawCommand::Text {
                    rect,
                    text,
                    size,
                    color,
                } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.set_font(&format!("{size}px 'Small Pixel7', monospace"));
                    ctx.set_text_baseline("middle");
                    ctx.set_text_align("left");
                    let _ = ctx.fill_text(text, rect.x as f64, rect.center().y as f64);
                }
            }
        }

        ctx.restore();
    }

    /// Draw one atlas frame; false if the sheet is not ready or lacks the frame
    fn draw_frame(&self, frame: &str, x: f32, y: f32, w: f32, h: f32) -> bool {
        let Some(sheet) = &self.sheet else {
            return false;
        };
        if !sheet.image.complete() || sheet.image.natural_width() == 0 {
            return false;
        }
        let Some(source) = sheet.atlas.frames.get(frame) else {
            return false;
        };
        let f = source.frame;
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &sheet.image,
                f.x as f64,
                f.y as f64,
                f.w as f64,
                f.h as f64,
                x as f64,
                y as f64,
                w as f64,
                h as f64,
            )
            .is_ok()
    }
}
