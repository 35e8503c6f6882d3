//! The whole page: sections stacked top to bottom, each with its own reveal
//! tracker and selection state, driven one frame at a time.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use folio_protocol::{
    Action, FormField, Rect, RenderCommand, SectionKind, ThemeMode, ThemeToken, Viewport,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{RelayConfig, SiteConfig};
use crate::contact::{
    ContactController, EmailRelay, FormError, RelayReply, RelayRequest, SubmitStatus,
};
use crate::content::Registry;
use crate::content::filter::{TagFilter, filter_items, filter_tabs};
use crate::hero::WordRotator;
use crate::reveal::{LayoutObserverHost, NodeHandle, RevealTracker, Threshold};
use crate::selection::SelectionState;
use crate::views::{
    self, SectionView, contact::ContactContent, experience::render_experience, hero::render_hero,
    journey::render_journey, projects::render_project_modal, projects::render_projects,
    skills::render_skills,
};

pub const NAV_HEIGHT: f64 = 64.0;
/// Cap on the hero's viewport-filling height.
const MAX_HERO_HEIGHT: f64 = 900.0;
/// Relay poll interval while a message is in flight.
const SUBMIT_POLL: Duration = Duration::from_millis(100);

/// What a front-end must do after [`Page::handle`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", content = "value")]
pub enum Effect {
    OpenUrl(String),
    /// Scroll the page so this y is at the top of the viewport.
    ScrollTo(f64),
    FocusField(FormField),
}

/// Reveal and selection state of one tracked section.
struct Section<F> {
    kind: SectionKind,
    tracker: RevealTracker<u32>,
    selection: SelectionState<u32, F>,
    attached: HashSet<NodeHandle>,
}

impl<F> Section<F> {
    fn mount(kind: SectionKind, host: &LayoutObserverHost, threshold: Threshold, filter: F) -> Self {
        Self {
            kind,
            tracker: RevealTracker::mount(host, threshold),
            selection: SelectionState::new(filter),
            attached: HashSet::new(),
        }
    }

    /// Attach the nodes of the latest layout and detach the ones that
    /// are no longer rendered (filtered out, other tab).
    fn sync(&mut self, host: &LayoutObserverHost, nodes: &[(u32, Rect)]) {
        let mut current = HashSet::with_capacity(nodes.len());
        for &(id, rect) in nodes {
            let node = node_handle(self.kind, id);
            host.set_bounds(node, rect);
            self.tracker.attach(id, node);
            current.insert(node);
        }
        for &stale in self.attached.difference(&current) {
            self.tracker.detach(stale);
            host.remove_node(stale);
        }
        self.attached = current;
    }

    fn revealed(&self) -> impl Fn(u32) -> bool + '_ {
        move |id| self.tracker.is_revealed(id)
    }
}

/// Node handles are unique across sections.
pub fn node_handle(kind: SectionKind, id: u32) -> NodeHandle {
    NodeHandle::new(((kind as u64) << 32) | u64::from(id))
}

/// Relay of a page that never sends; used by export copies.
struct Offline;

impl EmailRelay for Offline {
    fn dispatch(&self, _request: RelayRequest, _reply: RelayReply) {}
}

pub struct Page {
    registry: Arc<Registry>,
    host: LayoutObserverHost,
    threshold: Threshold,
    theme: ThemeMode,
    rotator: WordRotator,
    journey: Section<()>,
    skills: Section<usize>,
    projects: Section<TagFilter>,
    experience: Section<()>,
    contact: Section<()>,
    form: ContactController,
    modal_scroll: f64,
    modal_max_scroll: f64,
    offsets: Vec<(SectionKind, f64)>,
    height: f64,
}

impl Page {
    /// Mount every section on a fresh observation host.
    pub fn new(config: &SiteConfig, registry: Arc<Registry>, relay: Box<dyn EmailRelay>) -> Self {
        let rotator = WordRotator::new(
            registry.profile.rotating_words.clone(),
            config.word_interval(),
            config.word_gap(),
        );
        let form = ContactController::new(relay, config.relay.clone(), config.status_reset());
        Self::assemble(registry, config.threshold(), rotator, form)
    }

    fn assemble(
        registry: Arc<Registry>,
        threshold: Threshold,
        rotator: WordRotator,
        form: ContactController,
    ) -> Self {
        let host = LayoutObserverHost::new();
        Self {
            journey: Section::mount(SectionKind::Journey, &host, threshold, ()),
            skills: Section::mount(SectionKind::Skills, &host, threshold, 0),
            projects: Section::mount(SectionKind::Projects, &host, threshold, TagFilter::All),
            experience: Section::mount(SectionKind::Experience, &host, threshold, ()),
            contact: Section::mount(SectionKind::Contact, &host, threshold, ()),
            form,
            registry,
            host,
            threshold,
            theme: ThemeMode::default(),
            rotator,
            modal_scroll: 0.0,
            modal_max_scroll: 0.0,
            offsets: Vec::new(),
            height: 0.0,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    /// Total page height as of the last frame.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Page y of a section's top as of the last frame.
    pub fn section_offset(&self, kind: SectionKind) -> Option<f64> {
        self.offsets
            .iter()
            .find_map(|&(k, y)| (k == kind).then_some(y))
    }

    pub fn contact(&self) -> &ContactController {
        &self.form
    }

    pub fn contact_mut(&mut self) -> &mut ContactController {
        &mut self.form
    }

    pub fn is_revealed(&self, kind: SectionKind, id: u32) -> bool {
        self.tracker(kind).is_some_and(|t| t.is_revealed(id))
    }

    /// Revealed ids of a section, ascending.
    pub fn revealed_ids(&self, kind: SectionKind) -> Vec<u32> {
        self.tracker(kind)
            .map(|t| t.revealed().iter().copied().collect())
            .unwrap_or_default()
    }

    /// Nodes currently under observation in a section.
    pub fn attached_count(&self, kind: SectionKind) -> usize {
        self.tracker(kind).map_or(0, RevealTracker::attached_count)
    }

    pub fn expanded(&self, kind: SectionKind) -> Option<u32> {
        match kind {
            SectionKind::Journey => self.journey.selection.expanded(),
            SectionKind::Projects => self.projects.selection.expanded(),
            SectionKind::Experience => self.experience.selection.expanded(),
            _ => None,
        }
    }

    pub fn skill_tab(&self) -> usize {
        *self.skills.selection.filter()
    }

    pub fn project_filter(&self) -> &TagFilter {
        self.projects.selection.filter()
    }

    pub fn modal_open(&self) -> bool {
        self.projects.selection.expanded().is_some()
    }

    /// Scroll the open project modal's body.
    pub fn scroll_modal(&mut self, dy: f64) {
        self.modal_scroll = (self.modal_scroll + dy).clamp(0.0, self.modal_max_scroll);
    }

    fn tracker(&self, kind: SectionKind) -> Option<&RevealTracker<u32>> {
        match kind {
            SectionKind::Hero => None,
            SectionKind::Journey => Some(&self.journey.tracker),
            SectionKind::Skills => Some(&self.skills.tracker),
            SectionKind::Projects => Some(&self.projects.tracker),
            SectionKind::Experience => Some(&self.experience.tracker),
            SectionKind::Contact => Some(&self.contact.tracker),
        }
    }

    /// Lay out, observe, reveal, and compose one frame in viewport
    /// coordinates.
    pub fn frame(&mut self, viewport: &Viewport, now: Duration) -> Vec<RenderCommand> {
        self.form.poll(now);

        let mut views = self.layout(viewport, now);
        self.sync(&views);
        self.host.set_root(viewport.rect());
        self.host.flush();
        if self.pump() > 0 {
            views = self.layout(viewport, now);
        }
        self.compose(views, viewport)
    }

    /// Full-page frame with everything revealed. Rendered on a detached
    /// copy, so this page's reveal state is untouched.
    pub fn export(&self, width: f64, now: Duration) -> (Vec<RenderCommand>, f64) {
        let mut copy = self.detached();
        let probe = Viewport::new(width, MAX_HERO_HEIGHT);
        let height: f64 = copy.layout(&probe, now).iter().map(|(_, v)| v.height).sum();
        let commands = copy.frame(&Viewport::new(width, height), now);
        (commands, height)
    }

    /// Same content, theme, tabs, expanded entries and form text, with
    /// fresh trackers and no relay. The project modal stays closed.
    fn detached(&self) -> Page {
        let mut form = ContactController::new(Box::new(Offline), RelayConfig::default(), Duration::MAX);
        *form.form_mut() = self.form.form().clone();
        let mut copy = Self::assemble(
            Arc::clone(&self.registry),
            self.threshold,
            self.rotator.clone(),
            form,
        );
        copy.theme = self.theme;
        copy.skills.selection.set_filter(self.skill_tab());
        copy.projects.selection.set_filter(self.project_filter().clone());
        if let Some(id) = self.journey.selection.expanded() {
            copy.journey.selection.expand(id);
        }
        if let Some(id) = self.experience.selection.expanded() {
            copy.experience.selection.expand(id);
        }
        copy
    }

    /// Delay until time alone changes the page.
    pub fn next_deadline(&self, now: Duration) -> Duration {
        let mut next = self.rotator.next_change(now);
        match self.form.status() {
            SubmitStatus::Submitting => next = next.min(SUBMIT_POLL),
            SubmitStatus::Success | SubmitStatus::Error => next = next.min(SUBMIT_POLL * 5),
            SubmitStatus::Idle => {}
        }
        next
    }

    fn layout(&self, viewport: &Viewport, now: Duration) -> Vec<(SectionKind, SectionView)> {
        let r = &*self.registry;
        let width = viewport.width;
        let mut views = Vec::with_capacity(SectionKind::ALL.len());
        let mut top = 0.0;
        for kind in SectionKind::ALL {
            let view = match kind {
                SectionKind::Hero => render_hero(
                    &r.profile,
                    self.rotator.word_at(now),
                    top,
                    width,
                    viewport.height.min(MAX_HERO_HEIGHT),
                ),
                SectionKind::Journey => render_journey(
                    &r.journey,
                    self.journey.selection.expanded(),
                    &self.journey.revealed(),
                    top,
                    width,
                ),
                SectionKind::Skills => render_skills(
                    &r.skill_categories,
                    &r.certifications,
                    &r.languages,
                    self.skill_tab(),
                    &self.skills.revealed(),
                    top,
                    width,
                ),
                SectionKind::Projects => {
                    let filter = self.projects.selection.filter();
                    let shown = filter_items(&r.projects, filter);
                    let tabs = filter_tabs(&r.projects, &r.project_filters);
                    render_projects(&shown, &tabs, filter, &self.projects.revealed(), top, width)
                }
                SectionKind::Experience => render_experience(
                    &r.experiences,
                    self.experience.selection.expanded(),
                    &self.experience.revealed(),
                    top,
                    width,
                ),
                SectionKind::Contact => {
                    let content = ContactContent {
                        channels: &r.contact_channels,
                        socials: &r.social_links,
                        cv_url: &r.profile.cv_url,
                    };
                    views::contact::render_contact(
                        &content,
                        self.form.form(),
                        self.form.status(),
                        &self.contact.revealed(),
                        top,
                        width,
                    )
                }
            };
            top += view.height;
            views.push((kind, view));
        }
        views
    }

    fn sync(&mut self, views: &[(SectionKind, SectionView)]) {
        self.offsets.clear();
        let mut top = 0.0;
        for (kind, view) in views {
            self.offsets.push((*kind, top));
            top += view.height;
            let nodes = view.nodes.as_slice();
            match kind {
                SectionKind::Hero => {}
                SectionKind::Journey => self.journey.sync(&self.host, nodes),
                SectionKind::Skills => self.skills.sync(&self.host, nodes),
                SectionKind::Projects => self.projects.sync(&self.host, nodes),
                SectionKind::Experience => self.experience.sync(&self.host, nodes),
                SectionKind::Contact => self.contact.sync(&self.host, nodes),
            }
        }
        self.height = top;
    }

    /// Apply queued intersection entries. Returns how many items were
    /// revealed.
    fn pump(&mut self) -> usize {
        let mut total = 0;
        for (kind, tracker) in [
            (SectionKind::Journey, &mut self.journey.tracker),
            (SectionKind::Skills, &mut self.skills.tracker),
            (SectionKind::Projects, &mut self.projects.tracker),
            (SectionKind::Experience, &mut self.experience.tracker),
            (SectionKind::Contact, &mut self.contact.tracker),
        ] {
            let newly = tracker.pump();
            if !newly.is_empty() {
                debug!(section = %kind, ids = ?newly, "section items revealed");
            }
            total += newly.len();
        }
        total
    }

    fn compose(&mut self, views: Vec<(SectionKind, SectionView)>, viewport: &Viewport) -> Vec<RenderCommand> {
        let visible = viewport.rect();
        let mut commands = Vec::new();
        commands.push(RenderCommand::translate(-viewport.x, -viewport.y));
        let mut top = 0.0;
        for (_, view) in views {
            let span = Rect::new(visible.x, top, visible.w, view.height);
            if span.intersection(&visible).is_some() {
                commands.extend(view.commands);
            }
            top += view.height;
        }
        commands.push(RenderCommand::PopTransform);

        let screen = Rect::new(0.0, 0.0, viewport.width, viewport.height);
        commands.extend(self.nav_bar(screen));

        if let Some(id) = self.projects.selection.expanded() {
            match self.registry.projects.iter().find(|p| p.id == id) {
                Some(project) => {
                    let (modal, max_scroll) = render_project_modal(project, screen, self.modal_scroll);
                    self.modal_max_scroll = max_scroll;
                    self.modal_scroll = self.modal_scroll.min(max_scroll);
                    commands.extend(modal);
                }
                None => {
                    warn!(id, "expanded project no longer exists");
                    self.projects.selection.collapse();
                }
            }
        }
        commands
    }

    fn nav_bar(&self, screen: Rect) -> Vec<RenderCommand> {
        let bar = Rect::new(screen.x, screen.y, screen.w, NAV_HEIGHT);
        let mut commands = vec![
            RenderCommand::BeginGroup {
                id: "nav".into(),
                label: Some("Navigation".into()),
            },
            RenderCommand::DrawRect {
                rect: bar,
                color: ThemeToken::Surface,
                border_color: Some(ThemeToken::Border),
                label: None,
                action: None,
            },
            RenderCommand::DrawRect {
                rect: Rect::new(bar.x + 24.0, bar.y + 12.0, 120.0, 40.0),
                color: ThemeToken::Surface,
                border_color: None,
                label: Some(self.registry.profile.name.clone()),
                action: Some(Action::ScrollTo {
                    section: SectionKind::Hero,
                }),
            },
        ];
        let toggle = Rect::new(bar.right() - 64.0, bar.y + 12.0, 40.0, 40.0);
        let mut x = toggle.x - 16.0;
        // Section links right-aligned, skipped when they would collide
        // with the name.
        for kind in SectionKind::ALL.into_iter().skip(1).rev() {
            let w = views::text_width(kind.title(), views::BODY_SIZE) + 24.0;
            x -= w;
            if x < bar.x + 160.0 {
                break;
            }
            commands.push(RenderCommand::DrawRect {
                rect: Rect::new(x, bar.y + 12.0, w, 40.0),
                color: ThemeToken::Surface,
                border_color: None,
                label: Some(kind.title().into()),
                action: Some(Action::ScrollTo { section: kind }),
            });
            x -= 8.0;
        }
        let glyph = if self.theme.is_dark() { "\u{2600}" } else { "\u{263E}" };
        commands.push(RenderCommand::DrawRect {
            rect: toggle,
            color: ThemeToken::TabInactive,
            border_color: None,
            label: Some(glyph.into()),
            action: Some(Action::ToggleTheme),
        });
        commands.push(RenderCommand::EndGroup);
        commands
    }

    /// Apply a user action. Selection changes never touch reveal state.
    pub fn handle(&mut self, action: &Action, now: Duration) -> Option<Effect> {
        debug!(?action, "page action");
        match action {
            Action::SelectTab {
                section: SectionKind::Skills,
                tab,
            } => {
                if *tab < self.registry.skill_categories.len() {
                    self.skills.selection.set_filter(*tab);
                }
                None
            }
            Action::SelectTab {
                section: SectionKind::Projects,
                tab,
            } => {
                if let Some(f) = self.registry.project_filters.get(*tab) {
                    self.projects.selection.set_filter(TagFilter::from_tag(&f.tag));
                }
                None
            }
            Action::SelectTab { .. } => None,
            Action::ToggleItem { section, item } => {
                match section {
                    SectionKind::Journey => self.journey.selection.toggle(*item),
                    SectionKind::Experience => self.experience.selection.toggle(*item),
                    SectionKind::Projects => {
                        self.projects.selection.expand(*item);
                        self.modal_scroll = 0.0;
                    }
                    _ => {}
                }
                None
            }
            Action::CloseDetail { section } => {
                match section {
                    SectionKind::Journey => self.journey.selection.collapse(),
                    SectionKind::Projects => self.projects.selection.collapse(),
                    SectionKind::Experience => self.experience.selection.collapse(),
                    _ => {}
                }
                None
            }
            Action::OpenLink { url } => Some(Effect::OpenUrl(url.clone())),
            Action::ScrollTo { section } => {
                let y = self.section_offset(*section)?;
                let target = if *section == SectionKind::Hero {
                    0.0
                } else {
                    (y - NAV_HEIGHT).max(0.0)
                };
                Some(Effect::ScrollTo(target))
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggle();
                None
            }
            Action::EditField { field } => Some(Effect::FocusField(*field)),
            Action::SubmitContact => match self.form.submit(now) {
                Ok(()) => None,
                Err(FormError::MissingField(field)) => {
                    warn!(field = field.key(), "contact form incomplete");
                    Some(Effect::FocusField(field))
                }
                Err(FormError::InvalidEmail) => {
                    warn!("contact email is malformed");
                    Some(Effect::FocusField(FormField::Email))
                }
                Err(FormError::AlreadySubmitting) => None,
            },
        }
    }
}
