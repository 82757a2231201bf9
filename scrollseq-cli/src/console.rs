//! Scroller that prints every publish to stdout.

use scrollseq::{Direction, Publish, ScrollOptions, Scroller};

pub struct ConsoleScroller {
    name: String,
    direction: Direction,
}

impl ConsoleScroller {
    /// Build a scroller labelled by the `name` pass-through option.
    pub fn from_options(options: &ScrollOptions) -> Self {
        let name = options
            .extra
            .get("name")
            .and_then(|value| value.as_str())
            .unwrap_or("scrollview")
            .to_string();
        Self {
            name,
            direction: options.direction,
        }
    }
}

impl Scroller<String> for ConsoleScroller {
    fn sequence_from(&mut self, publish: Publish<String>) {
        let axis = match self.direction {
            Direction::Horizontal => "x",
            Direction::Vertical => "y",
        };
        let start = publish
            .start_index
            .map(|index| format!(" start={}", index))
            .unwrap_or_default();
        println!(
            "[{}:{}]{} {}",
            self.name,
            axis,
            start,
            publish.sequence.join(", ")
        );
    }

    fn render_handle(&self) -> String {
        format!("<{}>", self.name)
    }
}
