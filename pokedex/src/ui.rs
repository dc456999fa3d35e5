use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::catalog::FilterMode;
use crate::navigator::Route;
use crate::state::AppState;
use crate::theme::hex_color;
use crate::view::{self, DetailView, STAT_PROGRESS_MAX};

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const STAT_BAR_WIDTH: usize = 20;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PokedexComponentId {
    Catalog,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokedexContext {
    Catalog,
    Search,
    Detail,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        match self.route() {
            Route::Detail { .. } => Some(PokedexComponentId::Detail),
            Route::Catalog if self.catalog.search.active => Some(PokedexComponentId::Search),
            Route::Catalog => Some(PokedexComponentId::Catalog),
        }
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        if self.route() == Route::Catalog && self.catalog.search.active {
            Some(PokedexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::Catalog => PokedexContext::Catalog,
            PokedexComponentId::Search => PokedexContext::Search,
            PokedexComponentId::Detail => PokedexContext::Detail,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::Catalog
    }
}

pub struct PokedexUi {
    catalog_list: SelectList,
    status_bar: StatusBar,
}

impl Default for PokedexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl PokedexUi {
    pub fn new() -> Self {
        Self {
            catalog_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(3)])
            .split(area);

        match state.route() {
            Route::Catalog => {
                event_ctx.set_component_area(PokedexComponentId::Catalog, layout[0]);
                if state.catalog.search.active {
                    event_ctx.set_component_area(PokedexComponentId::Search, layout[0]);
                } else {
                    event_ctx.component_areas.remove(&PokedexComponentId::Search);
                }
                event_ctx.component_areas.remove(&PokedexComponentId::Detail);
                render_catalog(frame, layout[0], state, &mut self.catalog_list);
            }
            Route::Detail { .. } => {
                event_ctx.set_component_area(PokedexComponentId::Detail, layout[0]);
                event_ctx.component_areas.remove(&PokedexComponentId::Catalog);
                event_ctx.component_areas.remove(&PokedexComponentId::Search);
                render_detail(frame, layout[0], state);
            }
        }
        render_footer(frame, layout[1], state, &mut self.status_bar);
    }

    pub fn handle_catalog_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_catalog_event(event, state, &mut self.catalog_list)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_search_event(event, state)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_detail_event(event, state)
    }
}

pub fn handle_catalog_event(
    event: &EventKind,
    state: &AppState,
    catalog_list: &mut SelectList,
) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Enter => vec![Action::EntryOpen],
            KeyCode::Char(' ') | KeyCode::Char('c') => vec![Action::CaughtToggle],
            KeyCode::Char('1') => vec![Action::FilterSelect(FilterMode::Number)],
            KeyCode::Char('2') => vec![Action::FilterSelect(FilterMode::Name)],
            KeyCode::Char('3') => vec![Action::FilterSelect(FilterMode::Caught)],
            KeyCode::Char('4') => vec![Action::FilterSelect(FilterMode::Uncaught)],
            KeyCode::Char('0') => vec![Action::FilterReset],
            KeyCode::Char('x') => vec![Action::SearchClear],
            KeyCode::PageDown => vec![Action::SelectionPage(1)],
            KeyCode::PageUp => vec![Action::SelectionPage(-1)],
            _ => {
                let items = catalog_items(state);
                let props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: state.catalog.selected_index.min(items.len().saturating_sub(1)),
                    is_focused: true,
                    style: catalog_list_style(),
                    behavior: SelectListBehavior {
                        show_scrollbar: true,
                        wrap_navigation: false,
                    },
                    on_select: Action::CatalogSelect,
                    render_item: &|item| item.clone(),
                };
                let actions: Vec<_> =
                    catalog_list.handle_event(event, props).into_iter().collect();
                return handler_response(actions);
            }
        },
        EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Esc => vec![Action::SearchClear],
            KeyCode::Enter => vec![Action::SearchSubmit],
            KeyCode::Backspace => vec![Action::SearchBackspace],
            KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_detail_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    let Some(page) = state.detail.as_ref() else {
        return HandlerResponse::ignored();
    };
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Left | KeyCode::Char('h') if page.session.has_prev() => {
                vec![Action::DetailPrev]
            }
            KeyCode::Right | KeyCode::Char('l') if page.session.has_next() => {
                vec![Action::DetailNext]
            }
            KeyCode::Char('s') => vec![Action::DetailToggleShiny],
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => vec![Action::DetailBack],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

pub fn render_catalog(frame: &mut Frame, area: Rect, state: &AppState, catalog_list: &mut SelectList) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(area);
    render_catalog_header(frame, layout[0], state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("DEX")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_TEAL));
    let inner = block.inner(body[0]);
    frame.render_widget(block, body[0]);

    if state.catalog.not_found {
        let paragraph = Paragraph::new("Pokemon not found")
            .alignment(Alignment::Center)
            .style(Style::default().fg(ACCENT_GOLD));
        frame.render_widget(paragraph, inner);
    } else if state.catalog.loading {
        let paragraph = Paragraph::new(format!("Loading pokedex {}", spinner(state)))
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(paragraph, inner);
    } else {
        let items = catalog_items(state);
        let props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.catalog.selected_index.min(items.len().saturating_sub(1)),
            is_focused: !state.catalog.search.active,
            style: catalog_list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::CatalogSelect,
            render_item: &|item| item.clone(),
        };
        catalog_list.render(frame, inner, props);
    }

    render_catalog_preview(frame, body[1], state);
}

fn render_catalog_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let title_style = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);
    let mut filters = vec![Span::raw("Filter: ")];
    for mode in FilterMode::SELECTABLE {
        let selected = state.catalog.filter == mode;
        let marker = if selected { "(*)" } else { "( )" };
        let style = if selected {
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        filters.push(Span::styled(format!("{marker} {}  ", mode.label()), style));
    }
    let search = if state.catalog.search.active {
        format!("/{}_", state.catalog.search.query)
    } else if state.catalog.search.query.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", state.catalog.search.query)
    };
    let header_text = Text::from(vec![
        Line::from(vec![
            Span::styled("POKEDEX", title_style),
            Span::raw("  |  Search: "),
            Span::styled(search, Style::default().fg(ACCENT_TEAL)),
            Span::raw("  |  Caught: "),
            Span::styled(
                format!("{}/{}", state.flags.caught_count(), state.catalog.entries.len()),
                Style::default().fg(ACCENT_GOLD),
            ),
        ]),
        Line::from(filters),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let paragraph = Paragraph::new(header_text)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_catalog_preview(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("ENTRY")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let content = match state.catalog.selected_entry() {
        Some(entry) => {
            let row = view::catalog_row(entry, &state.flags);
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("{} {}", row.number, row.name),
                    Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Caught: {}", if row.caught { "yes" } else { "no" })),
                Line::from(""),
                Line::from(Span::styled(row.image_url, Style::default().fg(TEXT_DIM))),
            ];
            if state.catalog.pending_open == Some(row.id) {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Opening {}", spinner(state)),
                    Style::default().fg(ACCENT_GOLD),
                )));
            }
            Text::from(lines)
        }
        None => Text::from("[select a pokemon]"),
    };
    frame.render_widget(
        Paragraph::new(content)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

pub fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(page) = state.detail.as_ref() else {
        return;
    };
    let Some(detail) = view::detail_view(page) else {
        let paragraph = Paragraph::new(format!("Loading {}", spinner(state)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_DIM));
        frame.render_widget(paragraph, area);
        return;
    };

    let primary = detail
        .theme
        .and_then(|theme| hex_color(theme.primary))
        .unwrap_or(ACCENT_TEAL);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(vec![
            Span::styled(
                format!(" {} ", detail.title),
                Style::default().fg(BG_BASE).bg(primary).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(detail.number.clone(), Style::default().fg(TEXT_MAIN)),
        ]))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Min(2),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(nav_line(&detail, page.loading, state)), layout[0]);
    frame.render_widget(
        Paragraph::new(about_text(&detail)).wrap(Wrap { trim: false }),
        layout[1],
    );

    let stats_block = Block::default()
        .borders(Borders::TOP)
        .title("BASE STATS")
        .border_style(Style::default().fg(primary));
    frame.render_widget(
        Paragraph::new(stats_text(&detail, primary)).block(stats_block),
        layout[2],
    );
    frame.render_widget(
        Paragraph::new(detail.flavor_text.replace(['\n', '\u{000C}'], " "))
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(TEXT_DIM)),
        layout[3],
    );
}

fn nav_line(detail: &DetailView, loading: bool, state: &AppState) -> Text<'static> {
    let prev = if detail.has_prev { "< prev" } else { "      " };
    let next = if detail.has_next { "next >" } else { "" };
    let mut line = vec![
        Span::styled(prev, Style::default().fg(ACCENT_GOLD)),
        Span::raw("   "),
        Span::styled(next, Style::default().fg(ACCENT_GOLD)),
    ];
    if loading {
        line.push(Span::styled(
            format!("   {}", spinner(state)),
            Style::default().fg(TEXT_DIM),
        ));
    }
    Text::from(vec![
        Line::from(line),
        Line::from(Span::styled(
            detail.sprite_url.clone(),
            Style::default().fg(TEXT_DIM),
        )),
    ])
}

fn about_text(detail: &DetailView) -> Text<'static> {
    let mut badges = Vec::new();
    for badge in &detail.types {
        let bg = badge.color.and_then(hex_color).unwrap_or(BG_HIGHLIGHT);
        badges.push(Span::styled(
            format!(" {} ", badge.name),
            Style::default().fg(BG_BASE).bg(bg).add_modifier(Modifier::BOLD),
        ));
        badges.push(Span::raw(" "));
    }
    Text::from(vec![
        Line::from(badges),
        Line::from(""),
        Line::from(vec![
            Span::styled("Weight ", Style::default().fg(TEXT_DIM)),
            Span::raw(detail.weight.clone()),
            Span::styled("   Height ", Style::default().fg(TEXT_DIM)),
            Span::raw(detail.height.clone()),
            Span::styled("   Ability ", Style::default().fg(TEXT_DIM)),
            Span::raw(detail.ability.clone().unwrap_or_default()),
        ]),
    ])
}

fn stats_text(detail: &DetailView, primary: Color) -> Text<'static> {
    let lines = detail
        .stats
        .iter()
        .map(|stat| {
            let filled = stat.progress as usize * STAT_BAR_WIDTH / STAT_PROGRESS_MAX as usize;
            Line::from(vec![
                Span::styled(
                    format!("{:>4} ", stat.label),
                    Style::default().fg(primary).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{} ", stat.value)),
                Span::styled("█".repeat(filled), Style::default().fg(primary)),
                Span::styled(
                    "░".repeat(STAT_BAR_WIDTH - filled),
                    Style::default().fg(TEXT_DIM),
                ),
            ])
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = if state.is_loading() {
        format!("Loading {}", spinner(state))
    } else {
        state.route().to_string()
    };
    let hints = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];
    let center = [StatusBarHint::new("q", "Quit")];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::hints(&center).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    match state.route() {
        Route::Catalog if state.catalog.search.active => vec![
            StatusBarHint::new("Enter", "Done"),
            StatusBarHint::new("Esc", "Clear"),
            StatusBarHint::new("Bksp", "Delete"),
        ],
        Route::Catalog => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("Space", "Caught"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("1-4", "Filter"),
            StatusBarHint::new("0", "Reset"),
        ],
        Route::Detail { .. } => vec![
            StatusBarHint::new("h/l", "Prev/Next"),
            StatusBarHint::new("s", "Shiny"),
            StatusBarHint::new("Esc", "Back"),
        ],
    }
}

fn catalog_items(state: &AppState) -> Vec<Line<'static>> {
    view::catalog_rows(state)
        .into_iter()
        .map(|row| {
            let check = if row.caught { "[x]" } else { "[ ]" };
            Line::from(format!("{check} {:<5} {}", row.number, row.name))
        })
        .collect()
}

fn catalog_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn spinner(state: &AppState) -> &'static str {
    SPINNER[(state.tick % SPINNER.len() as u64) as usize]
}
