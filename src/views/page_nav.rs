/// Previous/next pagination control. Bounds are the owner's business.
pub struct PageNav<'a> {
    page: u32,
    previous_action: &'a str,
    next_action: &'a str,
    previous_disabled: bool,
}

impl<'a> PageNav<'a> {
    pub fn new(page: u32, previous_action: &'a str, next_action: &'a str) -> Self {
        Self {
            page,
            previous_action,
            next_action,
            previous_disabled: false,
        }
    }

    pub fn previous_disabled(mut self, disabled: bool) -> Self {
        self.previous_disabled = disabled;
        self
    }

    pub fn render(&self) -> String {
        format!(
            r#"<div class="page-nav" data-testid="page-nav">
    <form method="post" action="{previous}">
        <button type="submit" class="btn secondary" data-testid="previous-page"{disabled}>&lt; Previous</button>
    </form>
    <span class="page-number" data-testid="page-number">{page}</span>
    <form method="post" action="{next}">
        <button type="submit" class="btn secondary" data-testid="next-page">Next &gt;</button>
    </form>
</div>"#,
            previous = self.previous_action,
            next = self.next_action,
            disabled = if self.previous_disabled { " disabled" } else { "" },
            page = self.page,
        )
    }
}
