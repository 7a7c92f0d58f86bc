//! "Load more" post injection

use super::clock::{Millis, Scheduler};
use super::dom::{Dom, Element, ElementId};
use super::error::Result;
use super::layout::card_rect;
use super::Task;

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub title: &'static str,
    pub category: &'static str,
    pub date: &'static str,
    pub read_time: &'static str,
    pub excerpt: &'static str,
    pub author: &'static str,
}

/// The batch appended by every load
pub const MORE_POSTS: [BlogPost; 2] = [
    BlogPost {
        title: "The Art of Minimalist Web Design",
        category: "Design",
        date: "January 5, 2025",
        read_time: "6 min read",
        excerpt: "Exploring how less can be more in modern web design, focusing on clean layouts and user experience...",
        author: "Jessica Lee",
    },
    BlogPost {
        title: "Building Sustainable Tech Solutions",
        category: "Innovation",
        date: "January 3, 2025",
        read_time: "4 min read",
        excerpt: "How modern technology can contribute to environmental sustainability and green computing practices...",
        author: "David Park",
    },
];

pub const END_OF_FEED_MESSAGE: &str = "You've reached the end of our latest posts!";

/// Build a card element for `post`
pub fn blog_card(post: &BlogPost, key: &str) -> Element {
    Element::new("article")
        .key(key)
        .class("blog-card")
        .text(post.title)
        .data("category", post.category)
        .data("date", post.date)
        .data("read-time", post.read_time)
        .data("excerpt", post.excerpt)
        .data("author", post.author)
}

#[derive(Debug)]
pub struct LoadMoreFeed {
    max_cards: usize,
    stagger: Millis,
    exhausted: bool,
}

impl LoadMoreFeed {
    pub fn new(max_cards: usize, stagger: Millis) -> Self {
        Self {
            max_cards,
            stagger,
            exhausted: false,
        }
    }

    /// Append one batch to `grid`, each card fading in after its own delay.
    /// Returns the ids of the new cards.
    pub fn append_batch(
        &mut self,
        dom: &mut Dom,
        clock: &mut Scheduler<Task>,
        grid: ElementId,
    ) -> Result<Vec<ElementId>> {
        let mut added = Vec::with_capacity(MORE_POSTS.len());
        for (index, post) in MORE_POSTS.iter().enumerate() {
            let position = dom.children(grid).len();
            let key = format!("post-{}", position + 1);
            let card = dom.append(
                grid,
                blog_card(post, &key)
                    .at(card_rect(position))
                    .styled("opacity", "0")
                    .styled("transform", "translateY(30px)"),
            )?;
            clock.schedule_after(index as Millis * self.stagger, Task::RevealCard { element: card });
            added.push(card);
        }
        tracing::debug!("Loaded {} more posts", added.len());
        Ok(added)
    }

    /// Hide the trigger once the grid is past its cap.
    /// Returns true only on the call that performs the transition.
    pub fn check_exhausted(&mut self, dom: &mut Dom, grid: ElementId, button: ElementId) -> Result<bool> {
        if self.exhausted || dom.children(grid).len() <= self.max_cards {
            return Ok(false);
        }
        dom.element_mut(button)?.set_style("display", "none");
        self.exhausted = true;
        Ok(true)
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Second half of the staggered fade-in
pub fn reveal_card(dom: &mut Dom, card: ElementId) -> Result<()> {
    let el = dom.element_mut(card)?;
    el.set_style("transition", "opacity 0.6s ease-out, transform 0.6s ease-out");
    el.set_style("opacity", "1");
    el.set_style("transform", "translateY(0)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausts_once_past_cap() {
        let mut dom = Dom::new();
        let mut clock = Scheduler::new();
        let grid = dom.append(dom.body(), Element::new("div")).unwrap();
        let button = dom.append(dom.body(), Element::new("button")).unwrap();
        for i in 0..6 {
            dom.append(grid, blog_card(&MORE_POSTS[0], &format!("post-{}", i + 1))).unwrap();
        }
        let mut feed = LoadMoreFeed::new(8, 100);

        feed.append_batch(&mut dom, &mut clock, grid).unwrap();
        assert_eq!(dom.children(grid).len(), 8);
        assert!(!feed.check_exhausted(&mut dom, grid, button).unwrap());

        feed.append_batch(&mut dom, &mut clock, grid).unwrap();
        assert!(feed.check_exhausted(&mut dom, grid, button).unwrap());
        assert!(!feed.check_exhausted(&mut dom, grid, button).unwrap());
        assert!(dom.element(button).unwrap().is_hidden());
        assert!(feed.is_exhausted());
    }

    #[test]
    fn test_cards_fade_in_staggered() {
        let mut dom = Dom::new();
        let mut clock = Scheduler::new();
        let grid = dom.append(dom.body(), Element::new("div")).unwrap();
        let mut feed = LoadMoreFeed::new(8, 100);

        let cards = feed.append_batch(&mut dom, &mut clock, grid).unwrap();
        assert_eq!(dom.element(cards[1]).unwrap().key.as_deref(), Some("post-2"));
        assert_eq!(dom.element(cards[0]).unwrap().style("opacity"), Some("0"));

        let (_, first) = clock.pop_due(0).unwrap();
        assert_eq!(first, Task::RevealCard { element: cards[0] });
        assert!(clock.pop_due(99).is_none());
        let (_, second) = clock.pop_due(100).unwrap();
        assert_eq!(second, Task::RevealCard { element: cards[1] });

        reveal_card(&mut dom, cards[0]).unwrap();
        assert_eq!(dom.element(cards[0]).unwrap().style("opacity"), Some("1"));
    }
}
