use eframe::egui;
use std::f32::consts::TAU;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::clock::{Clock, Millis, SystemClock};
use crate::controller::{PresentationController, ScrollCommand, Timings};
use crate::document::{self, Block, Document};
use crate::loader::{LoadState, SlideLoader};
use crate::scroll::ScrollContainer;
use crate::slide::Slide;
use crate::source::{Resource, SlideSource};
use crate::theme::Theme;
use crate::viewer::{self, DocumentState, DocumentStore, Permission, Sandbox};
use crate::watch::SourceWatcher;

/// Navigation keys and the names the controller knows them by.
const NAV_KEYS: [(egui::Key, &str); 7] = [
    (egui::Key::ArrowDown, "ArrowDown"),
    (egui::Key::ArrowRight, "ArrowRight"),
    (egui::Key::PageDown, "PageDown"),
    (egui::Key::Space, " "),
    (egui::Key::ArrowUp, "ArrowUp"),
    (egui::Key::ArrowLeft, "ArrowLeft"),
    (egui::Key::PageUp, "PageUp"),
];

/// How often background work (slide list, documents, file watcher) is checked.
const BACKGROUND_POLL: Duration = Duration::from_millis(100);

pub struct ViewerOptions {
    pub windowed: bool,
    /// 1-indexed.
    pub start_slide: Option<usize>,
    pub theme: Theme,
    pub timings: Timings,
    pub watch: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NavRequest {
    Prev,
    Next,
    GoTo(usize),
}

/// A loaded, non-empty slide list and everything tied to it.
struct Deck {
    slides: Vec<Slide>,
    controller: PresentationController,
    scroll: ScrollContainer,
    documents: DocumentStore,
    sandbox: Sandbox,
    /// Offset last passed to the controller as a scroll event
    reported_offset: f32,
    /// Whether the start slide has been scrolled into place
    placed: bool,
}

impl Deck {
    fn new(
        slides: Vec<Slide>,
        source: Arc<dyn SlideSource>,
        timings: Timings,
        start_index: usize,
    ) -> Self {
        let count = slides.len();
        Self {
            slides,
            controller: PresentationController::new(count, timings).starting_at(start_index),
            scroll: ScrollContainer::new(count),
            documents: DocumentStore::new(source),
            sandbox: Sandbox::slide_default(),
            reported_offset: 0.0,
            placed: false,
        }
    }

    /// Stop the controller's timers. The deck ignores input afterwards.
    fn close(&mut self) {
        self.controller.dispose();
    }

    fn replace_slides(&mut self, slides: Vec<Slide>) {
        self.controller.set_slide_count(slides.len());
        self.documents.retain(&slides);
        self.slides = slides;
    }

    fn apply(&mut self, cmd: ScrollCommand) {
        self.scroll.scroll_to(cmd.offset, cmd.smooth);
    }

    fn navigate(&mut self, request: NavRequest, now: Millis) {
        let cmd = match request {
            NavRequest::Prev => self.controller.prev(now),
            NavRequest::Next => self.controller.next(now),
            NavRequest::GoTo(index) => self.controller.go_to(index as isize, now),
        };
        if let Some(cmd) = cmd {
            self.apply(cmd);
        }
    }

    /// Input, timers and loads for one frame.
    fn update(&mut self, ctx: &egui::Context, rect: egui::Rect, now: Millis) {
        let height = rect.height();
        self.controller.set_viewport_height(height);
        self.scroll.set_viewport(height, self.slides.len());

        if !self.placed && height > 0.0 {
            let start = self.controller.active_index().unwrap_or(0);
            self.scroll.scroll_to(start as f32 * height, false);
            self.reported_offset = self.scroll.offset();
            self.placed = true;
        }

        // Consuming the key keeps egui from acting on it as well.
        for (key, name) in NAV_KEYS {
            if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, key)) {
                if let Some(cmd) = self.controller.on_key(name, now).scroll_command() {
                    self.apply(cmd);
                }
            }
        }

        let wheel = ctx.input(|i| i.smooth_scroll_delta.y);
        if wheel != 0.0 {
            self.scroll.scroll_by(-wheel, now);
        }

        self.scroll.step(now);
        let offset = self.scroll.offset();
        if (offset - self.reported_offset).abs() > 0.01 {
            self.controller.on_scroll(offset, height, now);
            self.reported_offset = offset;
        }
        self.controller.poll(now);

        let active = self.controller.active_index();
        for (index, slide) in self.slides.iter().enumerate() {
            if viewer::should_load(index, active) {
                self.documents.request(slide);
            }
        }
        self.documents.poll();
    }

    fn repaint_after(&self, now: Millis) -> Option<Duration> {
        if self.scroll.is_animating() {
            return Some(Duration::ZERO);
        }
        let timer = self
            .controller
            .next_deadline()
            .map(|at| Duration::from_millis(at.saturating_sub(now)));
        let documents = self.documents.is_pending().then_some(BACKGROUND_POLL);
        match (timer, documents) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn draw(&self, ui: &egui::Ui, rect: egui::Rect, theme: &Theme, scale: f32) -> Option<NavRequest> {
        for index in self.scroll.visible_range() {
            let top = rect.top() + self.scroll.slide_top(index);
            let slide_rect = egui::Rect::from_min_size(egui::pos2(rect.left(), top), rect.size());
            self.draw_slide(ui, index, slide_rect, rect, theme, scale);
        }
        self.draw_chrome(ui, rect, theme, scale)
    }

    fn draw_slide(
        &self,
        ui: &egui::Ui,
        index: usize,
        slide_rect: egui::Rect,
        viewport: egui::Rect,
        theme: &Theme,
        scale: f32,
    ) {
        let slide = &self.slides[index];
        let is_active = self.controller.is_active(index);
        let visible = slide_rect.intersect(viewport);
        let painter = ui.painter_at(visible);
        painter.rect_filled(slide_rect, 0.0, theme.surface);

        match self.documents.state(slide.id).and_then(DocumentState::document) {
            Some(doc) => {
                let resource = self.documents.resource(slide.id);
                self.draw_document(ui, &painter, slide, doc, resource, slide_rect, is_active, theme, scale);
            }
            // Not requested yet, in flight, or failed: the indicator stays.
            None => draw_slide_loading(ui, &painter, slide_rect, theme, scale),
        }

        if viewer::blocks_input(is_active) {
            ui.interact(
                visible,
                egui::Id::new(("slide-overlay", slide.id)),
                egui::Sense::click_and_drag(),
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_document(
        &self,
        ui: &egui::Ui,
        painter: &egui::Painter,
        slide: &Slide,
        doc: &Document,
        resource: Option<&Resource>,
        rect: egui::Rect,
        is_active: bool,
        theme: &Theme,
        scale: f32,
    ) {
        let padding = 96.0 * scale;
        let content = rect.shrink(padding);
        let gap = 24.0 * scale;
        let mut y = content.top();

        let label = doc.title.as_deref().unwrap_or(&slide.title);
        let label_galley = painter.layout_no_wrap(
            label.to_uppercase(),
            egui::FontId::monospace(14.0 * scale.max(0.8)),
            theme.muted,
        );
        painter.galley(
            egui::pos2(content.left(), rect.top() + padding * 0.5),
            label_galley,
            theme.muted,
        );

        for block in &doc.blocks {
            if y > content.bottom() {
                break;
            }
            let (text, font, color, indent) = match block {
                Block::Heading { level, text } => (
                    text,
                    egui::FontId::proportional(theme.size_for_heading(*level) * scale),
                    theme.heading_color,
                    0.0,
                ),
                Block::Paragraph(text) => (
                    text,
                    egui::FontId::proportional(theme.body_size * scale),
                    theme.foreground,
                    0.0,
                ),
                Block::Quote(text) => (
                    text,
                    egui::FontId::proportional(theme.body_size * scale),
                    theme.muted,
                    28.0 * scale,
                ),
                Block::Preformatted(text) => (
                    text,
                    egui::FontId::monospace(theme.code_size * scale),
                    theme.foreground,
                    0.0,
                ),
            };
            let galley = painter.layout(text.clone(), font, color, content.width() - indent);
            let height = galley.rect.height();
            if indent > 0.0 {
                let bar = egui::Rect::from_min_size(
                    egui::pos2(content.left(), y),
                    egui::vec2(4.0 * scale, height),
                );
                painter.rect_filled(bar, 0.0, theme.accent);
            }
            painter.galley(egui::pos2(content.left() + indent, y), galley, color);
            y += height + gap;
        }

        // Links are the only interactive content. They open outside the
        // viewer, which the sandbox permits only through popups.
        if doc.links.is_empty() || y > content.bottom() {
            return;
        }
        let can_open = is_active && self.sandbox.allows(Permission::Popups);
        let font = egui::FontId::proportional(theme.body_size * 0.7 * scale);
        for (i, link) in doc.links.iter().enumerate() {
            if y > content.bottom() {
                break;
            }
            let text = if link.text.is_empty() {
                link.href.clone()
            } else {
                format!("{} \u{2197}", link.text)
            };
            let galley = painter.layout_no_wrap(text, font.clone(), theme.accent);
            let link_rect = egui::Rect::from_min_size(egui::pos2(content.left(), y), galley.rect.size());
            y += galley.rect.height() + gap * 0.5;
            painter.galley(link_rect.min, galley, theme.accent);

            if !can_open {
                continue;
            }
            let Some(target) = resource.and_then(|r| document::link_target(r, &link.href)) else {
                continue;
            };
            let response = ui
                .interact(
                    link_rect.intersect(painter.clip_rect()),
                    egui::Id::new(("slide-link", slide.id, i)),
                    egui::Sense::click(),
                )
                .on_hover_cursor(egui::CursorIcon::PointingHand);
            if response.clicked() {
                info!(url = %target, "opening link");
                ui.ctx().open_url(egui::OpenUrl::new_tab(target));
            }
        }
    }

    fn draw_chrome(&self, ui: &egui::Ui, rect: egui::Rect, theme: &Theme, scale: f32) -> Option<NavRequest> {
        let mut request = None;
        let painter = ui.painter();
        let chrome_scale = scale.max(0.6);
        let count = self.slides.len();
        let active = self.controller.active_index();

        // Counter
        let counter_pos = egui::pos2(rect.left() + 32.0 * chrome_scale, rect.top() + 24.0 * chrome_scale);
        let caption = painter.layout_no_wrap(
            "SLIDE".to_string(),
            egui::FontId::monospace(13.0 * chrome_scale),
            Theme::with_opacity(egui::Color32::WHITE, 0.6),
        );
        let caption_height = caption.rect.height();
        painter.galley(counter_pos, caption, egui::Color32::WHITE);
        let counter = painter.layout_no_wrap(
            self.controller.counter_label(),
            egui::FontId::proportional(30.0 * chrome_scale),
            egui::Color32::WHITE,
        );
        painter.galley(
            counter_pos + egui::vec2(0.0, caption_height + 4.0 * chrome_scale),
            counter,
            egui::Color32::WHITE,
        );

        // Progress dots
        let dot_spacing = 24.0 * chrome_scale;
        let dots_height = dot_spacing * count.saturating_sub(1) as f32;
        let dots_x = rect.right() - 32.0 * chrome_scale;
        let dots_top = rect.center().y - dots_height / 2.0;
        for index in 0..count {
            let center = egui::pos2(dots_x, dots_top + index as f32 * dot_spacing);
            let is_current = active == Some(index);
            let hit = egui::Rect::from_center_size(center, egui::vec2(dot_spacing, dot_spacing));
            let response = ui
                .interact(hit, egui::Id::new(("slide-dot", index)), egui::Sense::click())
                .on_hover_cursor(egui::CursorIcon::PointingHand);

            let (radius, color) = if is_current {
                (6.0 * chrome_scale * 1.2, theme.accent)
            } else {
                (6.0 * chrome_scale, Theme::with_opacity(egui::Color32::WHITE, 0.4))
            };
            painter.circle_filled(center, radius, color);

            if response.hovered() {
                let label = painter.layout_no_wrap(
                    format!("Slide {}", index + 1),
                    egui::FontId::proportional(12.0 * chrome_scale),
                    Theme::with_opacity(egui::Color32::WHITE, 0.8),
                );
                let size = label.rect.size() + egui::vec2(12.0, 6.0) * chrome_scale;
                let label_rect = egui::Rect::from_min_size(
                    egui::pos2(center.x - 20.0 * chrome_scale - size.x, center.y - size.y / 2.0),
                    size,
                );
                painter.rect_filled(label_rect, 4.0, Theme::with_opacity(egui::Color32::BLACK, 0.5));
                painter.galley(
                    label_rect.min + egui::vec2(6.0, 3.0) * chrome_scale,
                    label,
                    egui::Color32::WHITE,
                );
            }
            if response.clicked() {
                request = Some(NavRequest::GoTo(index));
            }
        }

        // Prev / next buttons
        let button_radius = 22.0 * chrome_scale;
        let margin = 32.0 * chrome_scale;
        let next_center = egui::pos2(
            rect.right() - margin - button_radius,
            rect.bottom() - margin - button_radius,
        );
        let prev_center = next_center - egui::vec2(0.0, button_radius * 2.0 + 8.0 * chrome_scale);
        let buttons = [
            (prev_center, "\u{25B2}", self.controller.can_prev(), NavRequest::Prev, "nav-prev"),
            (next_center, "\u{25BC}", self.controller.can_next(), NavRequest::Next, "nav-next"),
        ];
        for (center, glyph, enabled, nav, id) in buttons {
            let hit = egui::Rect::from_center_size(center, egui::vec2(button_radius, button_radius) * 2.0);
            let sense = if enabled {
                egui::Sense::click()
            } else {
                egui::Sense::hover()
            };
            let response = ui.interact(hit, egui::Id::new(id), sense);
            let opacity = if enabled { 0.8 } else { 0.3 };
            let fill = if enabled && response.hovered() {
                theme.accent
            } else {
                Theme::with_opacity(theme.control_background, opacity)
            };
            painter.circle_filled(center, button_radius, fill);
            let glyph_galley = painter.layout_no_wrap(
                glyph.to_string(),
                egui::FontId::proportional(16.0 * chrome_scale),
                Theme::with_opacity(theme.foreground, opacity + 0.2),
            );
            painter.galley(
                center - glyph_galley.rect.size() / 2.0,
                glyph_galley,
                theme.foreground,
            );
            if enabled && response.clicked() {
                request = Some(nav);
            }
        }

        // Progress bar
        let bar_height = 4.0 * chrome_scale;
        let track = egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.bottom() - bar_height),
            rect.right_bottom(),
        );
        painter.rect_filled(track, 0.0, Theme::with_opacity(egui::Color32::WHITE, 0.1));
        let mut fill = track;
        fill.set_width(track.width() * self.controller.progress());
        painter.rect_filled(fill, 0.0, theme.accent);

        request
    }
}

struct ViewerApp {
    loader: SlideLoader,
    deck: Option<Deck>,
    watcher: Option<SourceWatcher>,
    clock: SystemClock,
    theme: Theme,
    timings: Timings,
    /// 0-indexed
    start_index: usize,
}

impl ViewerApp {
    fn new(source: Arc<dyn SlideSource>, options: ViewerOptions) -> Self {
        let watcher = options.watch.as_deref().and_then(|path| {
            SourceWatcher::new(path)
                .map_err(|e| warn!(error = %e, "file watching disabled"))
                .ok()
        });
        Self {
            loader: SlideLoader::start(source),
            deck: None,
            watcher,
            clock: SystemClock::new(),
            theme: options.theme,
            timings: options.timings,
            start_index: options.start_slide.unwrap_or(1).saturating_sub(1),
        }
    }

    /// Bring the deck in line with the loader's state.
    fn sync_deck(&mut self) {
        match self.loader.state().slides() {
            Some(slides) if !slides.is_empty() => match &mut self.deck {
                Some(deck) => deck.replace_slides(slides.to_vec()),
                None => {
                    self.deck = Some(Deck::new(
                        slides.to_vec(),
                        Arc::clone(self.loader.source()),
                        self.timings,
                        self.start_index,
                    ));
                }
            },
            _ => {
                if let Some(mut deck) = self.deck.take() {
                    deck.close();
                }
            }
        }
    }

    /// Release the deck and the file watcher before the window goes away.
    fn shutdown(&mut self) {
        if let Some(mut deck) = self.deck.take() {
            deck.close();
        }
        self.watcher = None;
        info!("viewer closed");
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.clock.now_ms();

        if self.watcher.as_ref().is_some_and(SourceWatcher::poll) {
            info!("slide list changed on disk; reloading");
            self.loader.refresh();
        }
        if self.loader.poll() {
            self.sync_deck();
        }

        // Collect viewport commands to send AFTER the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut toggle_theme = false;
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
            }
            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
            }
            if i.key_pressed(egui::Key::D) {
                toggle_theme = true;
            }
        });
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        if toggle_theme {
            self.theme = self.theme.toggled();
        }

        let mut retry = false;
        let mut nav = None;
        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let scale = compute_scale(rect);
                match self.loader.state() {
                    LoadState::Loading => draw_loading(ui, rect, &self.theme, scale),
                    LoadState::Failed(message) => {
                        retry = draw_error(ui, rect, &self.theme, scale, message);
                    }
                    state if state.is_empty_deck() => draw_empty(ui, rect, &self.theme, scale),
                    LoadState::Ready(_) => {
                        if let Some(deck) = self.deck.as_mut() {
                            deck.update(ctx, rect, now);
                            nav = deck.draw(ui, rect, &self.theme, scale);
                        }
                    }
                }
            });

        if let (Some(request), Some(deck)) = (nav, self.deck.as_mut()) {
            deck.navigate(request, now);
            ctx.request_repaint();
        }
        if retry {
            self.loader.retry();
            self.sync_deck();
        }

        if self.loader.is_busy() || self.watcher.is_some() {
            ctx.request_repaint_after(BACKGROUND_POLL);
        }
        if let Some(delay) = self.deck.as_ref().and_then(|d| d.repaint_after(now)) {
            ctx.request_repaint_after(delay);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}

fn compute_scale(rect: egui::Rect) -> f32 {
    let ref_w = 1920.0;
    let ref_h = 1080.0;
    (rect.width() / ref_w).min(rect.height() / ref_h).max(0.35)
}

/// Rotating arc, drawn through `painter` so it stays clipped to its slide.
fn draw_spinner(ui: &egui::Ui, painter: &egui::Painter, center: egui::Pos2, radius: f32, color: egui::Color32) {
    let time = ui.input(|i| i.time) as f32;
    let start = time * 4.0;
    let sweep = TAU * 0.7;
    let points: Vec<egui::Pos2> = (0..=32)
        .map(|step| {
            let angle = start + sweep * step as f32 / 32.0;
            center + radius * egui::vec2(angle.cos(), angle.sin())
        })
        .collect();
    painter.add(egui::Shape::line(points, egui::Stroke::new(radius * 0.18, color)));
    ui.ctx().request_repaint();
}

fn draw_slide_loading(ui: &egui::Ui, painter: &egui::Painter, rect: egui::Rect, theme: &Theme, scale: f32) {
    let scale = scale.max(0.6);
    let center = rect.center();
    draw_spinner(ui, painter, center - egui::vec2(0.0, 20.0 * scale), 20.0 * scale, theme.accent);
    let galley = painter.layout_no_wrap(
        "LOADING SLIDE...".to_string(),
        egui::FontId::monospace(13.0 * scale),
        theme.muted,
    );
    painter.galley(
        egui::pos2(center.x - galley.rect.width() / 2.0, center.y + 16.0 * scale),
        galley,
        theme.muted,
    );
}

fn draw_centered_text(
    painter: &egui::Painter,
    text: &str,
    top: f32,
    rect: egui::Rect,
    font: egui::FontId,
    color: egui::Color32,
) -> f32 {
    let galley = painter.layout(text.to_string(), font, color, rect.width() * 0.6);
    let height = galley.rect.height();
    painter.galley(
        egui::pos2(rect.center().x - galley.rect.width() / 2.0, top),
        galley,
        color,
    );
    height
}

fn draw_loading(ui: &egui::Ui, rect: egui::Rect, theme: &Theme, scale: f32) {
    let scale = scale.max(0.6);
    let painter = ui.painter();
    let center = rect.center();
    draw_spinner(ui, painter, center - egui::vec2(0.0, 60.0 * scale), 28.0 * scale, theme.accent);
    let mut y = center.y;
    y += draw_centered_text(
        painter,
        "Preparing Presentation",
        y,
        rect,
        egui::FontId::proportional(32.0 * scale),
        egui::Color32::WHITE,
    );
    draw_centered_text(
        painter,
        "Loading slides and assets...",
        y + 8.0 * scale,
        rect,
        egui::FontId::proportional(18.0 * scale),
        theme.muted,
    );
}

/// Returns `true` when the user asked to retry.
fn draw_error(ui: &egui::Ui, rect: egui::Rect, theme: &Theme, scale: f32, message: &str) -> bool {
    let scale = scale.max(0.6);
    let painter = ui.painter();
    let panel = egui::Rect::from_center_size(rect.center(), egui::vec2(560.0, 320.0) * scale);
    painter.rect_filled(panel, 16.0 * scale, Theme::with_opacity(theme.error, 0.12));

    let mut y = panel.top() + 32.0 * scale;
    y += draw_centered_text(
        painter,
        "\u{26A0}",
        y,
        rect,
        egui::FontId::proportional(40.0 * scale),
        theme.error,
    );
    y += 8.0 * scale;
    y += draw_centered_text(
        painter,
        "Unable to Load Presentation",
        y,
        rect,
        egui::FontId::proportional(24.0 * scale),
        theme.error,
    );
    y += 12.0 * scale;
    y += draw_centered_text(
        painter,
        "We encountered an error while fetching the presentation slides.",
        y,
        rect,
        egui::FontId::proportional(15.0 * scale),
        theme.muted,
    );
    y += 4.0 * scale;
    draw_centered_text(
        painter,
        message,
        y,
        rect,
        egui::FontId::monospace(12.0 * scale),
        theme.muted,
    );

    let button = egui::Rect::from_center_size(
        egui::pos2(rect.center().x, panel.bottom() - 44.0 * scale),
        egui::vec2(200.0, 40.0) * scale,
    );
    let response = ui
        .interact(button, egui::Id::new("retry"), egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    let fill = if response.hovered() {
        Theme::with_opacity(egui::Color32::WHITE, 0.85)
    } else {
        egui::Color32::WHITE
    };
    painter.rect_filled(button, 8.0 * scale, fill);
    let label = painter.layout_no_wrap(
        "Retry Connection".to_string(),
        egui::FontId::proportional(16.0 * scale),
        egui::Color32::BLACK,
    );
    painter.galley(button.center() - label.rect.size() / 2.0, label, egui::Color32::BLACK);

    response.clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter))
}

fn draw_empty(ui: &egui::Ui, rect: egui::Rect, theme: &Theme, scale: f32) {
    let scale = scale.max(0.6);
    draw_centered_text(
        ui.painter(),
        "No slides available.",
        rect.center().y - 14.0 * scale,
        rect,
        egui::FontId::proportional(24.0 * scale),
        theme.muted,
    );
}

pub fn run(source: Arc<dyn SlideSource>, options: ViewerOptions) -> anyhow::Result<()> {
    let title = format!("scrolldeck - {}", source.describe());
    info!(source = %source.describe(), "starting viewer");

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(source, options)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
