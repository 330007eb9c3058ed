//! Stat Counter Animator
//!
//! Counts every `.stat-number` up from zero to its `data-target` the first
//! time the stats block scrolls into view.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use leptos::prelude::{GetUntracked, RwSignal, Set};
use web_sys::Element;

use crate::context::PageContext;
use crate::error::SetupResult;

const STATS_SELECTOR: &str = ".about-stats";
const STAT_NUMBER_SELECTOR: &str = ".stat-number";
const TARGET_ATTR: &str = "data-target";

/// What a counter should display after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterFrame {
    /// Still counting, showing this value
    Running(u32),
    /// Reached the target; no further steps
    Done(u32),
}

impl CounterFrame {
    pub fn value(self) -> u32 {
        match self {
            CounterFrame::Running(v) | CounterFrame::Done(v) => v,
        }
    }
}

/// Running value advancing toward an immutable target in fixed increments
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: u32,
    increment: f64,
    current: f64,
}

impl CounterAnimation {
    pub fn new(target: u32, steps: u32) -> Self {
        Self {
            target,
            increment: f64::from(target) / f64::from(steps.max(1)),
            current: 0.0,
        }
    }

    /// Advance one increment. Snaps to the target once it is reached so
    /// float error never shows up in the display.
    pub fn step(&mut self) -> CounterFrame {
        let target = f64::from(self.target);
        if self.current >= target {
            return CounterFrame::Done(self.target);
        }
        self.current += self.increment;
        if self.current >= target {
            CounterFrame::Done(self.target)
        } else {
            // ceil can still round past the target when it is fractional-close
            CounterFrame::Running((self.current.ceil() as u32).min(self.target))
        }
    }
}

/// Parse a `data-target` attribute; `None` for anything but a non-negative integer
pub fn parse_target(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse().ok()
}

/// Stats block has entered the lower part of the viewport
pub fn stats_in_view(top: f64, viewport_height: f64, ratio: f64) -> bool {
    top < viewport_height * ratio
}

/// Fires once, the first time the stats block is seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartLatch {
    fired: bool,
}

impl StartLatch {
    /// True exactly once: on the first call with `in_view` set
    pub fn try_fire(&mut self, in_view: bool) -> bool {
        if self.fired || !in_view {
            return false;
        }
        self.fired = true;
        true
    }
}

/// Handle to a single counter's timer; dropping the interval stops it
type TickHandle = Rc<RefCell<Option<Interval>>>;

fn start_counter(el: Element, target: u32, ctx: &PageContext) {
    let mut anim = CounterAnimation::new(target, ctx.config.counter_steps);
    let first = anim.step();
    el.set_text_content(Some(&first.value().to_string()));
    if let CounterFrame::Done(_) = first {
        return;
    }

    let handle: TickHandle = Rc::new(RefCell::new(None));
    let tick_handle = Rc::clone(&handle);
    let tick = Interval::new(ctx.config.counter_tick_ms, move || {
        let frame = anim.step();
        el.set_text_content(Some(&frame.value().to_string()));
        if let CounterFrame::Done(_) = frame {
            tick_handle.borrow_mut().take();
        }
    });
    *handle.borrow_mut() = Some(tick);
}

fn run_all(ctx: &PageContext) {
    let counters = page_events::query_all(&ctx.document, STAT_NUMBER_SELECTOR).unwrap_or_default();
    log::info!("[Counter] animating {} counters", counters.len());
    for el in counters {
        match parse_target(el.get_attribute(TARGET_ATTR).as_deref()) {
            Some(target) => start_counter(el, target, ctx),
            None => log::warn!("[Counter] skipping counter with bad {}", TARGET_ATTR),
        }
    }
}

/// Watch scrolling and start all counters once, when the stats block shows up
pub fn init(ctx: &PageContext) -> SetupResult<()> {
    let stats: Element = page_events::query(&ctx.document, STATS_SELECTOR)?;
    let latch = RwSignal::new(StartLatch::default());

    let check = {
        let ctx = ctx.clone();
        move || {
            let mut next = latch.get_untracked();
            let top = stats.get_bounding_client_rect().top();
            let in_view = stats_in_view(top, ctx.viewport_height(), ctx.config.counter_trigger_ratio);
            if next.try_fire(in_view) {
                latch.set(next);
                run_all(&ctx);
            }
        }
    };

    // Stats may already be on screen at load
    check();
    page_events::listen(&ctx.window, "scroll", move |_| check())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(target: u32) -> Vec<CounterFrame> {
        let mut anim = CounterAnimation::new(target, 50);
        let mut frames = Vec::new();
        loop {
            let frame = anim.step();
            frames.push(frame);
            if let CounterFrame::Done(_) = frame {
                return frames;
            }
            assert!(frames.len() < 1000, "counter never finished");
        }
    }

    #[test]
    fn test_counter_ends_exactly_on_target() {
        let frames = run_to_end(100);
        assert_eq!(frames.last(), Some(&CounterFrame::Done(100)));
        assert!(frames.iter().all(|f| f.value() <= 100));
        assert_eq!(frames.len(), 50);
    }

    #[test]
    fn test_counter_values_never_decrease() {
        let frames = run_to_end(7);
        let values: Vec<u32> = frames.iter().map(|f| f.value()).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*values.last().unwrap(), 7);
        assert!(values.iter().all(|v| *v <= 7));
    }

    #[test]
    fn test_zero_target_finishes_immediately() {
        let mut anim = CounterAnimation::new(0, 50);
        assert_eq!(anim.step(), CounterFrame::Done(0));
        assert_eq!(anim.step(), CounterFrame::Done(0));
    }

    #[test]
    fn test_finished_counter_stays_done() {
        let mut anim = CounterAnimation::new(10, 50);
        while let CounterFrame::Running(_) = anim.step() {}
        assert_eq!(anim.step(), CounterFrame::Done(10));
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target(Some("150")), Some(150));
        assert_eq!(parse_target(Some(" 42 ")), Some(42));
        assert_eq!(parse_target(Some("-3")), None);
        assert_eq!(parse_target(Some("many")), None);
        assert_eq!(parse_target(None), None);
    }

    #[test]
    fn test_latch_fires_once_when_in_view() {
        let mut latch = StartLatch::default();
        assert!(!latch.try_fire(false));
        assert!(!latch.try_fire(false));
        assert!(latch.try_fire(true));
        assert!(!latch.try_fire(true));
        assert!(!latch.try_fire(false));
        assert!(!latch.try_fire(true));
    }

    #[test]
    fn test_stats_in_view_uses_lower_quarter_cutoff() {
        assert!(stats_in_view(599.0, 800.0, 0.75));
        assert!(!stats_in_view(600.0, 800.0, 0.75));
        assert!(stats_in_view(-50.0, 800.0, 0.75));
    }
}
