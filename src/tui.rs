// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Terminal Tree View
//!
//! Left pane: the vendor → product → version tree with checkboxes. Right
//! pane: details of the focused node. The checkbox state is driven entirely
//! by [`TreeSelection`].

use crate::catalog::{Catalog, NodeDetail};
use crate::tree::{CheckState, TreeNode, TreeSelection};
use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};
use std::collections::HashSet;

/// User intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move cursor up
    Up,
    /// Move cursor down
    Down,
    /// Toggle the checkbox under the cursor
    Toggle,
    /// Show details of the row under the cursor
    Focus,
    /// Expand the row under the cursor
    Expand,
    /// Collapse the row under the cursor (or jump to its parent)
    Collapse,
    /// Clear Selection
    Clear,
    /// Leave the view
    Quit,
}

impl Action {
    /// Map a key to an action
    #[must_use]
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up | KeyCode::Char('k') => Some(Self::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Self::Down),
            KeyCode::Char(' ') => Some(Self::Toggle),
            KeyCode::Enter => Some(Self::Focus),
            KeyCode::Right | KeyCode::Char('l') => Some(Self::Expand),
            KeyCode::Left | KeyCode::Char('h') => Some(Self::Collapse),
            KeyCode::Char('c') => Some(Self::Clear),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}

/// A visible tree row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Node id
    pub id: String,
    /// Display label
    pub label: String,
    /// Nesting depth, 0 for vendors
    pub depth: usize,
    /// Whether the node has children
    pub has_children: bool,
}

/// Tree View state
pub struct App {
    catalog: Catalog,
    tree: Vec<TreeNode>,
    selection: TreeSelection,
    expanded: HashSet<String>,
    cursor: usize,
    done: bool,
}

impl App {
    /// Build the view over a catalog; vendors start expanded
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let tree = catalog.product_tree();
        let expanded = tree.iter().map(|n| n.id.clone()).collect();
        Self {
            catalog,
            tree,
            selection: TreeSelection::new(),
            expanded,
            cursor: 0,
            done: false,
        }
    }

    /// Current selection state
    #[must_use]
    pub fn selection(&self) -> &TreeSelection {
        &self.selection
    }

    /// Whether the user asked to quit
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Visible rows in display order
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        fn walk(nodes: &[TreeNode], depth: usize, expanded: &HashSet<String>, out: &mut Vec<Row>) {
            for node in nodes {
                out.push(Row {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    depth,
                    has_children: !node.is_leaf(),
                });
                if expanded.contains(&node.id) {
                    walk(&node.children, depth + 1, expanded, out);
                }
            }
        }

        let mut rows = Vec::new();
        walk(&self.tree, 0, &self.expanded, &mut rows);
        rows
    }

    /// Row under the cursor
    #[must_use]
    pub fn current(&self) -> Option<Row> {
        self.rows().into_iter().nth(self.cursor)
    }

    /// Apply one action
    pub fn handle(&mut self, action: Action) {
        let rows = self.rows();
        let current = rows.get(self.cursor).cloned();
        match action {
            Action::Up => self.cursor = self.cursor.saturating_sub(1),
            Action::Down => {
                if self.cursor + 1 < rows.len() {
                    self.cursor += 1;
                }
            }
            Action::Toggle => {
                if let Some(row) = current {
                    self.selection.toggle(&self.tree, &row.id);
                }
            }
            Action::Focus => {
                if let Some(row) = current {
                    self.selection.focus(&row.id);
                }
            }
            Action::Expand => {
                if let Some(row) = current.filter(|r| r.has_children) {
                    self.expanded.insert(row.id);
                }
            }
            Action::Collapse => {
                if let Some(row) = current {
                    if !self.expanded.remove(&row.id) {
                        if let Some(parent) = crate::tree::find_parent(&self.tree, &row.id) {
                            let parent_id = parent.id.clone();
                            self.expanded.remove(&parent_id);
                            self.cursor = self.rows().iter().position(|r| r.id == parent_id).unwrap_or(0);
                        }
                    }
                }
            }
            // Clear Selection is disabled while nothing is selected
            Action::Clear if self.selection.is_empty() => {}
            Action::Clear => self.selection.clear(),
            Action::Quit => self.done = true,
        }
    }

    fn check_state(&self, id: &str) -> CheckState {
        crate::tree::find_node(&self.tree, id).map_or(CheckState::Unchecked, |node| self.selection.check_state(node))
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        let Some(id) = self.selection.focused() else {
            return vec![Line::from("Select a row and press enter to see its details.")];
        };
        let field = |name: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{name}: "), Style::new().add_modifier(Modifier::BOLD)),
                Span::raw(value),
            ])
        };

        let mut lines = Vec::new();
        match self.catalog.node_detail(id) {
            Some(NodeDetail::Vendor(vendor)) => {
                lines.push(field("Vendor", vendor.name.clone()));
                lines.push(field("ID", vendor.id.clone()));
                if let Some(desc) = &vendor.description {
                    lines.push(field("Description", desc.clone()));
                }
                lines.push(field("Products", self.catalog.products_of(&vendor.id).len().to_string()));
            }
            Some(NodeDetail::Product(product)) => {
                lines.push(field("Product", product.name.clone()));
                lines.push(field("ID", product.id.clone()));
                lines.push(field("Type", product.product_type.to_string()));
                lines.push(field("Vendor", self.catalog.label(&product.vendor_id)));
                if let Some(desc) = &product.description {
                    lines.push(field("Description", desc.clone()));
                }
                lines.push(field("Versions", self.catalog.versions_of(&product.id).len().to_string()));
            }
            Some(NodeDetail::Version(version)) => {
                lines.push(field("Version", version.name.clone()));
                lines.push(field("ID", version.id.clone()));
                lines.push(field("Product", self.catalog.label(&version.product_id)));
                if let Some(date) = version.released_at {
                    lines.push(field("Released", date.to_string()));
                }
                if let Some(desc) = &version.description {
                    lines.push(field("Description", desc.clone()));
                }
                let helpers = self.catalog.helpers_for(&version.id);
                if !helpers.is_empty() {
                    lines.push(Line::from(""));
                    lines.push(Line::styled("Identification helpers", Style::new().add_modifier(Modifier::UNDERLINED)));
                    for helper in helpers {
                        lines.push(field(helper.metadata.category().as_str(), helper.metadata.summary()));
                    }
                }
                let relationships = self.catalog.relationships_of(&version.id);
                if !relationships.is_empty() {
                    lines.push(Line::from(""));
                    lines.push(Line::styled("Relationships", Style::new().add_modifier(Modifier::UNDERLINED)));
                    for rel in relationships {
                        lines.push(Line::from(format!(
                            "{} {} {}",
                            self.catalog.label(&rel.source_id),
                            rel.category,
                            self.catalog.label(&rel.target_id)
                        )));
                    }
                }
            }
            None => lines.push(Line::from(format!("{id} no longer exists"))),
        }
        lines
    }

    /// Draw the view
    pub fn render(&self, frame: &mut Frame) {
        let [main, status] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());
        let [left, right] = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(main);

        let rows = self.rows();
        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| {
                let fold = match (row.has_children, self.expanded.contains(&row.id)) {
                    (false, _) => "  ",
                    (true, true) => "▾ ",
                    (true, false) => "▸ ",
                };
                let state = self.check_state(&row.id);
                let marker_style = match state {
                    CheckState::Checked => Style::new().fg(Color::Green),
                    CheckState::Partial => Style::new().fg(Color::Yellow),
                    CheckState::Unchecked => Style::new(),
                };
                ListItem::new(Line::from(vec![
                    Span::raw("  ".repeat(row.depth)),
                    Span::raw(fold),
                    Span::styled(state.marker(), marker_style),
                    Span::raw(" "),
                    Span::raw(row.label.clone()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::bordered().title(" Tree View "))
            .highlight_style(Style::new().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default().with_selected((!rows.is_empty()).then_some(self.cursor));
        frame.render_stateful_widget(list, left, &mut state);

        let detail = Paragraph::new(self.detail_lines())
            .block(Block::bordered().title(" Details "))
            .wrap(Wrap { trim: false });
        frame.render_widget(detail, right);

        let clear_hint = if self.selection.is_empty() {
            Span::styled("c clear (nothing selected)", Style::new().fg(Color::DarkGray))
        } else {
            Span::raw("c clear")
        };
        let status_line = Line::from(vec![
            Span::styled(
                format!(" {} selected ", self.selection.selected().len()),
                Style::new().add_modifier(Modifier::BOLD),
            ),
            Span::raw("│ space toggle │ enter details │ ←/→ fold │ "),
            clear_hint,
            Span::raw(" │ q quit"),
        ]);
        frame.render_widget(Paragraph::new(status_line), status);
    }
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.is_done() {
        terminal.draw(|frame| app.render(frame))?;
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(action) = Action::from_key(key.code) {
                app.handle(action);
            }
        }
    }
    Ok(())
}

/// Run the Tree View until the user quits; returns the final selection
pub fn run(catalog: Catalog) -> Result<Vec<String>> {
    let mut app = App::new(catalog);
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result?;
    Ok(app.selection().selected().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, ProductType, ProductVersion, Vendor};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let acme = Vendor::new("Acme", Some("Tools".into()));
        let anvil = Product::new(&acme.id, "Anvil", ProductType::Hardware, None);
        catalog.add_vendor(acme).unwrap();
        catalog.add_product(anvil.clone()).unwrap();
        catalog.add_version(ProductVersion::new(&anvil.id, "1.0", None, None)).unwrap();
        catalog.add_version(ProductVersion::new(&anvil.id, "2.0", None, None)).unwrap();
        catalog
    }

    #[test]
    fn test_rows_follow_expansion() {
        let mut app = App::new(catalog());
        assert_eq!(app.rows().len(), 2);

        app.handle(Action::Down);
        app.handle(Action::Expand);
        assert_eq!(app.rows().len(), 4);

        app.handle(Action::Collapse);
        assert_eq!(app.rows().len(), 2);
    }

    #[test]
    fn test_toggle_product_selects_vendor() {
        let mut app = App::new(catalog());
        app.handle(Action::Down);
        app.handle(Action::Toggle);

        let selection = app.selection();
        assert!(selection.contains("vendor:acme"));
        assert!(selection.contains("version:acme/anvil@1.0"));
        assert_eq!(selection.focused(), Some("product:acme/anvil"));
    }

    #[test]
    fn test_clear_selection_closes_details() {
        let mut app = App::new(catalog());
        app.handle(Action::Toggle);
        assert!(!app.selection().is_empty());

        app.handle(Action::Clear);
        assert!(app.selection().is_empty());
        assert!(app.selection().focused().is_none());
    }

    #[test]
    fn test_clear_is_disabled_without_selection() {
        let mut app = App::new(catalog());
        app.handle(Action::Focus);

        app.handle(Action::Clear);
        assert!(app.selection().is_empty());
        assert_eq!(app.selection().focused(), Some("vendor:acme"));
    }

    #[test]
    fn test_focus_does_not_select() {
        let mut app = App::new(catalog());
        app.handle(Action::Focus);
        assert!(app.selection().is_empty());
        assert_eq!(app.selection().focused(), Some("vendor:acme"));
    }

    #[test]
    fn test_render_shows_details() {
        let mut app = App::new(catalog());
        app.handle(Action::Focus);

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Tree View"));
        assert!(text.contains("Vendor: Acme"));
        assert!(text.contains("0 selected"));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(Action::from_key(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(Action::from_key(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(Action::from_key(KeyCode::Char('z')), None);
    }
}
