// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Line store: the doubly-linked sequence of display lines.
//!
//! Nodes live in a `SlotMap` and link to each other through `NodeId` handles,
//! so removing a node never leaves a dangling reference behind. Positional
//! operations take and return a `NodeRef`, which pairs a handle with the
//! node's ordinal position; callers always know where they are in the
//! sequence, which lets the store keep the cursor hint's ordinal exact when
//! nodes are inserted or removed in front of it.

use crate::error::BufferError;
use crate::integrity::IntegrityError;
use crate::line::DisplayLine;
use crate::NodeId;
use slotmap::SlotMap;

/// A node handle together with its ordinal position in the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    pub id: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone)]
struct Node {
    line: DisplayLine,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct LineStore {
    nodes: SlotMap<NodeId, Node>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    width: usize,
    /// Movable lookup hint. Its index is always the node's true ordinal.
    cursor: Option<NodeRef>,
}

impl LineStore {
    pub fn new(width: usize) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
            width,
            cursor: None,
        }
    }

    /// A store holding one empty source line
    pub fn with_empty_line(width: usize) -> Self {
        let mut store = Self::new(width);
        let id = store.nodes.insert(Node {
            line: DisplayLine::new(0, 0, true, Vec::new()),
            prev: None,
            next: None,
        });
        store.head = Some(id);
        store.tail = Some(id);
        store
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<NodeRef> {
        self.head.map(|id| NodeRef { id, index: 0 })
    }

    pub fn tail(&self) -> Option<NodeRef> {
        self.tail.map(|id| NodeRef {
            id,
            index: self.nodes.len() - 1,
        })
    }

    pub fn cursor(&self) -> Option<NodeRef> {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Option<NodeRef>) {
        self.cursor = cursor;
    }

    pub fn line(&self, node: NodeRef) -> &DisplayLine {
        &self.nodes[node.id].line
    }

    pub fn line_mut(&mut self, node: NodeRef) -> &mut DisplayLine {
        &mut self.nodes[node.id].line
    }

    pub fn next(&self, node: NodeRef) -> Option<NodeRef> {
        self.nodes[node.id].next.map(|id| NodeRef {
            id,
            index: node.index + 1,
        })
    }

    pub fn prev(&self, node: NodeRef) -> Option<NodeRef> {
        self.nodes[node.id].prev.map(|id| NodeRef {
            id,
            index: node.index - 1,
        })
    }

    /// Link a new node directly after `at`, or at the head when `at` is `None`.
    pub fn insert_after(
        &mut self,
        at: Option<NodeRef>,
        line: DisplayLine,
    ) -> Result<NodeRef, BufferError> {
        if line.len() > self.width {
            return Err(BufferError::invalid_args(format!(
                "display line of {} bytes does not fit width {}",
                line.len(),
                self.width
            )));
        }

        let prev = at.map(|node| node.id);
        let next = match at {
            Some(node) => self.nodes[node.id].next,
            None => self.head,
        };
        let id = self.nodes.insert(Node { line, prev, next });

        match prev {
            Some(prev) => self.nodes[prev].next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(next) => self.nodes[next].prev = Some(id),
            None => self.tail = Some(id),
        }

        let index = at.map_or(0, |node| node.index + 1);
        if let Some(cursor) = self.cursor.as_mut() {
            if cursor.index >= index {
                cursor.index += 1;
            }
        }

        Ok(NodeRef { id, index })
    }

    /// Unlink and drop a node, returning its payload.
    ///
    /// A cursor on the removed node moves to its successor, or to its
    /// predecessor at the end of the sequence. If the node closed its source
    /// line, a predecessor on the same source line takes over the flag.
    pub fn remove(&mut self, node: NodeRef) -> Option<DisplayLine> {
        let removed = self.nodes.remove(node.id)?;

        match removed.prev {
            Some(prev) => self.nodes[prev].next = removed.next,
            None => self.head = removed.next,
        }
        match removed.next {
            Some(next) => self.nodes[next].prev = removed.prev,
            None => self.tail = removed.prev,
        }

        self.cursor = match self.cursor {
            Some(cursor) if cursor.id == node.id => match (removed.next, removed.prev) {
                (Some(next), _) => Some(NodeRef {
                    id: next,
                    index: node.index,
                }),
                (None, Some(prev)) => Some(NodeRef {
                    id: prev,
                    index: node.index - 1,
                }),
                (None, None) => None,
            },
            Some(cursor) if cursor.index > node.index => Some(NodeRef {
                id: cursor.id,
                index: cursor.index - 1,
            }),
            other => other,
        };

        if removed.line.line_end {
            if let Some(prev) = removed.prev {
                let prev_line = &mut self.nodes[prev].line;
                if prev_line.source_line == removed.line.source_line {
                    prev_line.line_end = true;
                }
            }
        }

        Some(removed.line)
    }

    /// Locate the node at ordinal `index`, walking from whichever of the head,
    /// the tail or the cursor hint is closest.
    pub fn find_by_index(&self, index: usize) -> Option<NodeRef> {
        let len = self.nodes.len();
        if index >= len {
            return None;
        }

        let mut start = self.head()?;
        let mut distance = index;
        if let Some(tail) = self.tail() {
            if tail.index - index < distance {
                start = tail;
                distance = tail.index - index;
            }
        }
        if let Some(cursor) = self.cursor {
            if cursor.index.abs_diff(index) < distance {
                start = cursor;
            }
        }

        let mut node = start;
        while node.index < index {
            node = self.next(node)?;
        }
        while node.index > index {
            node = self.prev(node)?;
        }
        Some(node)
    }

    /// Add `delta` to the source line of `from` and every node after it.
    pub fn shift_source_lines(&mut self, from: Option<NodeRef>, delta: isize) {
        let mut id = from.map(|node| node.id);
        while let Some(current) = id {
            let node = &mut self.nodes[current];
            node.line.source_line = node.line.source_line.saturating_add_signed(delta);
            id = node.next;
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            store: self,
            next: self.head(),
        }
    }

    /// Walk the links in both directions and confirm they agree with the
    /// recorded head, tail, count and cursor.
    pub fn check_links(&self) -> Result<(), IntegrityError> {
        let mut count = 0;
        let mut prev: Option<NodeId> = None;
        let mut id = self.head;
        let mut cursor_seen = false;

        while let Some(current) = id {
            let node = self
                .nodes
                .get(current)
                .ok_or(IntegrityError::DanglingLink(count))?;
            if node.prev != prev {
                return Err(IntegrityError::BrokenBackLink(count));
            }
            if let Some(cursor) = self.cursor {
                if cursor.id == current {
                    if cursor.index != count {
                        return Err(IntegrityError::StaleCursor {
                            recorded: cursor.index,
                            actual: count,
                        });
                    }
                    cursor_seen = true;
                }
            }
            prev = Some(current);
            id = node.next;
            count += 1;
            if count > self.nodes.len() {
                return Err(IntegrityError::Cycle);
            }
        }

        if count != self.nodes.len() {
            return Err(IntegrityError::CountMismatch {
                linked: count,
                stored: self.nodes.len(),
            });
        }
        if self.tail != prev {
            return Err(IntegrityError::TailMismatch);
        }
        if let Some(cursor) = self.cursor {
            if !cursor_seen {
                return Err(IntegrityError::StaleCursor {
                    recorded: cursor.index,
                    actual: count,
                });
            }
        }
        Ok(())
    }
}

/// Front-to-back iterator over the display lines of a store
pub(crate) struct Iter<'a> {
    store: &'a LineStore,
    next: Option<NodeRef>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeRef, &'a DisplayLine);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = self.store.next(node);
        Some((node, self.store.line(node)))
    }
}
