use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use crate::models::github::{Commit, Repository};
use crate::ui::app::{App, Route, SearchFocus};

const SPINNER_CHARS: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];

pub fn draw(f: &mut Frame, app: &App, spinner_frame: usize) {
    match app.route {
        Route::Search => draw_search(f, app, spinner_frame),
        Route::Commits => draw_commits(f, app, spinner_frame),
    }
}

fn draw_search(f: &mut Frame, app: &App, spinner_frame: usize) {
    let chunks = Layout::vertical([
        Constraint::Length(8),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(f.area());

    draw_search_form(f, app, chunks[0]);
    draw_repo_list(f, app, chunks[1], spinner_frame);

    let hints = if app.focus == SearchFocus::Results {
        "↑/↓ select · Enter view commits · Esc back to form · Ctrl+C quit"
    } else {
        "Tab next field · Enter search · Ctrl+R reset · Esc quit"
    };
    f.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn draw_search_form(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.search.form;
    let mut lines = vec![
        form_line(
            "Search by",
            format!("◂ {} ▸", form.search_by.label()),
            app.focus == SearchFocus::SearchBy,
        ),
        form_line("Query", form.query.clone(), app.focus == SearchFocus::Query),
        form_line(
            "Language",
            form.language.clone(),
            app.focus == SearchFocus::Language,
        ),
        form_line("Min stars", form.stars.clone(), app.focus == SearchFocus::Stars),
    ];
    if app.search.submitted && !form.is_valid() {
        lines.push(Line::from(Span::styled(
            "Query is required",
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Search")),
        area,
    );
}

fn form_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![
        Span::styled(format!("{:<10}", label), label_style),
        Span::raw(" "),
        Span::raw(value),
    ];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn draw_repo_list(f: &mut Frame, app: &App, area: Rect, spinner_frame: usize) {
    let block = Block::bordered().title("Repositories");

    if app.search.loading {
        let spinner = SPINNER_CHARS[spinner_frame % SPINNER_CHARS.len()];
        f.render_widget(
            Paragraph::new(format!("{} Searching…", spinner))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    if !app.search.has_results() {
        let message = if app.search.submitted {
            "No repositories found"
        } else {
            "Enter a query and press Enter to search"
        };
        f.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app.search.repos.iter().map(repo_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.repo_index));
    f.render_stateful_widget(list, area, &mut state);
}

fn repo_item(repo: &Repository) -> ListItem<'_> {
    let language = repo.language.as_deref().unwrap_or("-");
    ListItem::new(Line::from(vec![
        Span::styled(repo.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  ★ {}", repo.stargazers_count),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(format!("  {}", language), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(
                "  {}  {}",
                repo.created_at.format("%Y-%m-%d"),
                repo.owner.login
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

fn draw_commits(f: &mut Frame, app: &App, spinner_frame: usize) {
    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(f.area());

    let title = match &app.commits.params {
        Some(params) => format!("Commits: {}/{}", params.owner, params.repo),
        None => "Commits".to_string(),
    };
    let block = Block::bordered().title(title);

    if app.commits.loading {
        let spinner = SPINNER_CHARS[spinner_frame % SPINNER_CHARS.len()];
        f.render_widget(
            Paragraph::new(format!("{} Loading commits…", spinner))
                .alignment(Alignment::Center)
                .block(block),
            chunks[0],
        );
    } else if app.commits.no_results() {
        f.render_widget(
            Paragraph::new("No commits found")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block),
            chunks[0],
        );
    } else {
        let items: Vec<ListItem> = app.commits.commits.iter().map(commit_item).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(app.commit_index));
        f.render_stateful_widget(list, chunks[0], &mut state);
    }

    f.render_widget(
        Paragraph::new("↑/↓ select · Enter open in browser · b back · Ctrl+C quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

fn commit_item(commit: &Commit) -> ListItem<'_> {
    let sha = commit.sha.get(..7).unwrap_or(&commit.sha);
    let first_line = commit.commit.message.lines().next().unwrap_or("");

    let mut spans = vec![
        Span::styled(sha.to_string(), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("  {}", commit.commit.author.date.format("%Y-%m-%d")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("  {}", commit.commit.author.name)),
    ];
    if let Some(author) = &commit.author {
        spans.push(Span::styled(
            format!(" @{}", author.login),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::raw(format!("  {}", first_line)));
    ListItem::new(Line::from(spans))
}
