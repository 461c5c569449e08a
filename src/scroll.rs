//! The scroll controller, modeled as a pure state machine so it can be
//! exercised without a browser. The platform adapter feeds it viewport
//! samples and millisecond timestamps on every scroll event; it answers with
//! the effects to apply (load another batch, move the footer, update the
//! live status region). All work is single-threaded and event-driven; the
//! controller holds no reference to the working set and asks nothing of the
//! platform beyond applying the returned effects.

/// Minimum interval between scroll evaluations, in milliseconds.
pub const DEBOUNCE_MS: u64 = 100;

/// How close to the bottom of the document (in pixels) a reader must be
/// before the next batch loads.
pub const LOAD_THRESHOLD_PX: f64 = 100.0;

/// How long a batch-load announcement stays in the live region.
pub const ANNOUNCE_CLEAR_MS: u64 = 1000;

/// How long the footer-reveal announcement stays in the live region.
pub const FOOTER_ANNOUNCE_CLEAR_MS: u64 = 2000;

/// A scroll-position sample, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

/// A short human-readable string for the assistive-technology status region,
/// cleared after a fixed delay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub clear_after_ms: u64,
}

impl Announcement {
    /// Announces a completed batch load.
    pub fn batch_loaded(count: usize) -> Announcement {
        Announcement {
            text: format!("Loaded {} more posts", count),
            clear_after_ms: ANNOUNCE_CLEAR_MS,
        }
    }

    /// Announces that the working set is exhausted.
    pub fn end_of_posts() -> Announcement {
        Announcement {
            text: "End of posts".to_owned(),
            clear_after_ms: ANNOUNCE_CLEAR_MS,
        }
    }

    fn footer_visible() -> Announcement {
        Announcement {
            text: "Footer now visible with additional links".to_owned(),
            clear_after_ms: FOOTER_ANNOUNCE_CLEAR_MS,
        }
    }
}

/// An effect for the platform adapter to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Ask the session for the next batch.
    LoadMore,

    /// One-time restore of the footer element, which starts hidden so it
    /// never paints before the first content batch.
    RevealFooter,

    /// Slide the footer into view (last movement was downward).
    ShowFooter,

    /// Slide the footer out of view (last movement was upward).
    HideFooter,

    /// Update the live status region.
    Announce(Announcement),
}

/// Per-view scroll state. Owned by the view session's controller; never
/// shared across views.
#[derive(Debug, Default)]
pub struct ScrollController {
    last_eval_ms: Option<u64>,
    last_scroll_top: f64,
    footer_revealed: bool,
    footer_announced: bool,
}

impl ScrollController {
    pub fn new() -> ScrollController {
        ScrollController::default()
    }

    /// Evaluates one scroll event. Events arriving within [`DEBOUNCE_MS`] of
    /// the previous evaluation are dropped, so at most one evaluation runs
    /// per interval. `exhausted` is the working set's latched exhaustion
    /// flag; once set, no more [`Effect::LoadMore`] is emitted.
    pub fn on_scroll(&mut self, vp: Viewport, now_ms: u64, exhausted: bool) -> Vec<Effect> {
        if let Some(last) = self.last_eval_ms {
            if now_ms.saturating_sub(last) < DEBOUNCE_MS {
                return Vec::new();
            }
        }
        self.last_eval_ms = Some(now_ms);

        let mut effects = Vec::new();
        if !exhausted
            && vp.scroll_top + vp.viewport_height >= vp.document_height - LOAD_THRESHOLD_PX
        {
            effects.push(Effect::LoadMore);
        }

        // Direction-based footer reveal, independent of the load logic.
        if vp.scroll_top > self.last_scroll_top {
            effects.push(Effect::ShowFooter);
            if !self.footer_announced {
                effects.push(Effect::Announce(Announcement::footer_visible()));
                self.footer_announced = true;
            }
        } else {
            effects.push(Effect::HideFooter);
        }
        self.last_scroll_top = vp.scroll_top;

        effects
    }

    /// The one-time footer reveal, fired after the first batch of content
    /// paints. Returns `None` on every call but the first.
    pub fn reveal_footer(&mut self) -> Option<Effect> {
        if self.footer_revealed {
            return None;
        }
        self.footer_revealed = true;
        Some(Effect::RevealFooter)
    }
}
