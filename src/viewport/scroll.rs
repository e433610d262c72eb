//! Animated scrolling.

use std::future::Future;
use std::io;
use std::time::Duration;
use tracing::debug;

/// Which extreme to scroll to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ScrollTarget {
    #[default]
    Top,
    Bottom,
}

/// A surface with a vertical scroll position.
pub trait ScrollSurface {
    fn scroll_offset(&self) -> usize;

    /// Largest valid offset.
    fn max_scroll_offset(&self) -> usize;

    /// Move to `offset` and redraw.
    fn set_scroll_offset(&mut self, offset: usize) -> io::Result<()>;
}

/// Shape of the scroll animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMotion {
    /// Number of frames; 0 jumps straight to the target.
    pub steps: u32,
    /// Time between frames.
    pub frame: Duration,
}

impl Default for ScrollMotion {
    fn default() -> Self {
        Self {
            steps: 12,
            frame: Duration::from_millis(16),
        }
    }
}

/// Scroll `surface` to the top or bottom over a short animation.
///
/// The last frame always lands exactly on the target.
pub async fn smooth_scroll<S>(
    surface: &mut S,
    target: ScrollTarget,
    motion: ScrollMotion,
) -> io::Result<()>
where
    S: ScrollSurface + ?Sized,
{
    let start = surface.scroll_offset();
    let end = match target {
        ScrollTarget::Top => 0,
        ScrollTarget::Bottom => surface.max_scroll_offset(),
    };

    if start == end {
        return Ok(());
    }

    debug!("Scrolling {:?} from {} to {}", target, start, end);

    if motion.steps == 0 {
        return surface.set_scroll_offset(end);
    }

    let mut ticker = tokio::time::interval(motion.frame);
    let mut last = start;
    for step in 1..=motion.steps {
        ticker.tick().await;
        let progress = ease_out_cubic(f64::from(step) / f64::from(motion.steps));
        let position = interpolate(start, end, progress);
        if position != last {
            surface.set_scroll_offset(position)?;
            last = position;
        }
    }

    if last != end {
        surface.set_scroll_offset(end)?;
    }
    Ok(())
}

/// Like [`smooth_scroll`], but stop at the current frame once `cancel`
/// resolves. Returns `false` when the animation was cut short.
pub async fn smooth_scroll_until<S, C>(
    surface: &mut S,
    target: ScrollTarget,
    motion: ScrollMotion,
    cancel: C,
) -> io::Result<bool>
where
    S: ScrollSurface + ?Sized,
    C: Future,
{
    tokio::select! {
        scrolled = smooth_scroll(surface, target, motion) => scrolled.map(|()| true),
        _ = cancel => {
            debug!("Scroll cancelled");
            Ok(false)
        }
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

fn interpolate(start: usize, end: usize, progress: f64) -> usize {
    let start = start as f64;
    let end = end as f64;
    (start + (end - start) * progress).round().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        offset: usize,
        max: usize,
        visited: Vec<usize>,
    }

    impl ScrollSurface for Recorder {
        fn scroll_offset(&self) -> usize {
            self.offset
        }

        fn max_scroll_offset(&self) -> usize {
            self.max
        }

        fn set_scroll_offset(&mut self, offset: usize) -> io::Result<()> {
            self.offset = offset;
            self.visited.push(offset);
            Ok(())
        }
    }

    fn motion() -> ScrollMotion {
        ScrollMotion {
            steps: 8,
            frame: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_scroll_to_bottom_is_animated() {
        let mut surface = Recorder {
            offset: 0,
            max: 200,
            visited: Vec::new(),
        };
        smooth_scroll(&mut surface, ScrollTarget::Bottom, motion())
            .await
            .unwrap();

        assert_eq!(surface.offset, 200);
        assert!(surface.visited.len() > 1);
        assert!(surface.visited.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_scroll_to_top() {
        let mut surface = Recorder {
            offset: 57,
            max: 200,
            visited: Vec::new(),
        };
        smooth_scroll(&mut surface, ScrollTarget::Top, motion())
            .await
            .unwrap();

        assert_eq!(surface.offset, 0);
        assert_eq!(surface.visited.last(), Some(&0));
        assert!(surface.visited.windows(2).all(|w| w[0] > w[1]));
    }

    #[tokio::test]
    async fn test_already_at_target_does_nothing() {
        let mut surface = Recorder {
            offset: 0,
            max: 0,
            visited: Vec::new(),
        };
        smooth_scroll(&mut surface, ScrollTarget::Bottom, motion())
            .await
            .unwrap();
        assert!(surface.visited.is_empty());
    }

    #[tokio::test]
    async fn test_zero_steps_jumps() {
        let mut surface = Recorder {
            offset: 0,
            max: 9,
            visited: Vec::new(),
        };
        let jump = ScrollMotion {
            steps: 0,
            ..motion()
        };
        smooth_scroll(&mut surface, ScrollTarget::Bottom, jump)
            .await
            .unwrap();
        assert_eq!(surface.visited, vec![9]);
    }

    #[tokio::test]
    async fn test_cancel_stops_scroll_early() {
        let mut surface = Recorder {
            offset: 0,
            max: 200,
            visited: Vec::new(),
        };
        let slow = ScrollMotion {
            steps: 20,
            frame: Duration::from_millis(50),
        };
        let finished = smooth_scroll_until(
            &mut surface,
            ScrollTarget::Bottom,
            slow,
            std::future::ready(()),
        )
        .await
        .unwrap();

        assert!(!finished);
        assert!(surface.offset < 200);
    }

    #[tokio::test]
    async fn test_uncancelled_scroll_reaches_target() {
        let mut surface = Recorder {
            offset: 0,
            max: 30,
            visited: Vec::new(),
        };
        let finished = smooth_scroll_until(
            &mut surface,
            ScrollTarget::Bottom,
            motion(),
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

        assert!(finished);
        assert_eq!(surface.offset, 30);
    }
}
