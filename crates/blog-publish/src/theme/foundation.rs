//! The built-in "foundation" theme.

use std::collections::BTreeMap;

use minijinja::{context, Environment, Value};
use serde::Serialize;

use super::{Theme, ThemeError};
use crate::model::{Item, MetadataValue, Page, Section, SiteModel, TagListing};
use crate::site::SiteDescriptor;

/// A navigation link to a section.
#[derive(Debug, Clone, Serialize)]
struct NavLink {
    id: String,
    title: String,
    href: String,
}

/// Site-wide values shared by every template.
#[derive(Debug, Clone, Serialize)]
struct SiteView {
    name: String,
    description: String,
    language: String,
    image: Option<String>,
    home: String,
    stylesheet: String,
    feed: String,
    tags: String,
    nav: Vec<NavLink>,
}

#[derive(Debug, Clone, Serialize)]
struct TagView {
    name: String,
    href: String,
}

#[derive(Debug, Clone, Serialize)]
struct ItemView<'a> {
    title: &'a str,
    description: &'a str,
    href: String,
    /// Human readable, e.g. `March 1, 2024`
    date: String,
    /// `YYYY-MM-DD` for the `datetime` attribute
    datetime: String,
    section: &'a str,
    section_title: String,
    section_href: String,
    tags: Vec<TagView>,
    content: &'a str,
    metadata: &'a BTreeMap<String, MetadataValue>,
}

#[derive(Debug, Clone, Serialize)]
struct TagSummary {
    name: String,
    href: String,
    count: usize,
}

fn site_view(site: &SiteDescriptor) -> SiteView {
    SiteView {
        name: site.name().to_string(),
        description: site.description().to_string(),
        language: site.language().to_string(),
        image: site.image_path().map(|path| site.url_for(path)),
        home: site.href_for(""),
        stylesheet: site.href_for("styles.css"),
        feed: site.href_for("feed.rss"),
        tags: site.href_for("tags"),
        nav: site
            .sections()
            .iter()
            .map(|id| NavLink {
                id: id.to_string(),
                title: id.title(),
                href: site.href_for(id.as_str()),
            })
            .collect(),
    }
}

fn item_view<'a>(site: &SiteDescriptor, model: &SiteModel, item: &'a Item) -> ItemView<'a> {
    let section_title = model
        .sections
        .get(&item.section)
        .map(|section| section.title.clone())
        .unwrap_or_else(|| item.section.title());

    ItemView {
        title: &item.title,
        description: &item.description,
        href: site.href_for(&item.path),
        date: item.date.format("%B %-d, %Y").to_string(),
        datetime: item.date.format("%Y-%m-%d").to_string(),
        section: item.section.as_str(),
        section_title,
        section_href: site.href_for(item.section.as_str()),
        tags: item
            .tags
            .iter()
            .map(|tag| TagView {
                name: tag.name.clone(),
                href: site.href_for(&tag.path()),
            })
            .collect(),
        content: &item.html,
        metadata: &item.metadata,
    }
}

fn item_views<'a>(
    site: &SiteDescriptor,
    model: &SiteModel,
    items: impl IntoIterator<Item = &'a Item>,
) -> Vec<ItemView<'a>> {
    items.into_iter().map(|item| item_view(site, model, item)).collect()
}

/// Clean, minimal theme rendered with minijinja templates.
pub struct Foundation {
    env: Environment<'static>,
}

impl Foundation {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_loader(|name| Ok(template_source(name).map(str::to_string)));
        Self { env }
    }

    fn render(&self, template: &str, ctx: Value) -> Result<String, ThemeError> {
        let tmpl = self.env.get_template(template)?;
        Ok(tmpl.render(ctx)?)
    }
}

impl Default for Foundation {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for Foundation {
    fn name(&self) -> &str {
        "foundation"
    }

    fn render_index(&self, site: &SiteDescriptor, model: &SiteModel) -> Result<String, ThemeError> {
        let title = model.index.title.as_deref().unwrap_or(site.name());
        let description = model
            .index
            .description
            .as_deref()
            .unwrap_or(site.description());

        self.render(
            "index.html",
            context! {
                site => site_view(site),
                title => title,
                description => description,
                url => site.url_for(""),
                current => "",
                intro => &model.index.html,
                items => item_views(site, model, model.items_newest_first()),
            },
        )
    }

    fn render_section(
        &self,
        site: &SiteDescriptor,
        model: &SiteModel,
        section: &Section,
    ) -> Result<String, ThemeError> {
        self.render(
            "section.html",
            context! {
                site => site_view(site),
                title => &section.title,
                description => site.description(),
                url => site.url_for(section.path()),
                current => section.id.as_str(),
                intro => &section.html,
                items => item_views(site, model, &section.items),
            },
        )
    }

    fn render_item(
        &self,
        site: &SiteDescriptor,
        model: &SiteModel,
        item: &Item,
    ) -> Result<String, ThemeError> {
        let description = if item.description.is_empty() {
            site.description()
        } else {
            item.description.as_str()
        };

        self.render(
            "item.html",
            context! {
                site => site_view(site),
                title => &item.title,
                description => description,
                url => site.url_for(&item.path),
                current => item.section.as_str(),
                body_class => "item-page",
                item => item_view(site, model, item),
            },
        )
    }

    fn render_page(
        &self,
        site: &SiteDescriptor,
        _model: &SiteModel,
        page: &Page,
    ) -> Result<String, ThemeError> {
        let description = if page.description.is_empty() {
            site.description()
        } else {
            page.description.as_str()
        };

        self.render(
            "page.html",
            context! {
                site => site_view(site),
                title => &page.title,
                description => description,
                url => site.url_for(&page.path),
                current => "",
                content => &page.html,
            },
        )
    }

    fn render_tag_list(
        &self,
        site: &SiteDescriptor,
        _model: &SiteModel,
        tags: &[TagListing<'_>],
    ) -> Result<String, ThemeError> {
        let tags: Vec<TagSummary> = tags
            .iter()
            .map(|listing| TagSummary {
                name: listing.tag.name.clone(),
                href: site.href_for(&listing.tag.path()),
                count: listing.items.len(),
            })
            .collect();

        self.render(
            "tags.html",
            context! {
                site => site_view(site),
                title => "Browse all tags",
                description => site.description(),
                url => site.url_for("tags"),
                current => "",
                tags => tags,
            },
        )
    }

    fn render_tag(
        &self,
        site: &SiteDescriptor,
        model: &SiteModel,
        listing: &TagListing<'_>,
    ) -> Result<String, ThemeError> {
        self.render(
            "tag.html",
            context! {
                site => site_view(site),
                title => format!("Tagged with {}", listing.tag.name),
                description => site.description(),
                url => site.url_for(&listing.tag.path()),
                current => "",
                tag => &listing.tag.name,
                items => item_views(site, model, listing.items.iter().copied()),
            },
        )
    }

    fn stylesheet(&self) -> &str {
        FOUNDATION_CSS
    }
}

fn template_source(name: &str) -> Option<&'static str> {
    match name {
        "base.html" => Some(BASE_TEMPLATE),
        "index.html" => Some(INDEX_TEMPLATE),
        "section.html" => Some(SECTION_TEMPLATE),
        "item.html" => Some(ITEM_TEMPLATE),
        "page.html" => Some(PAGE_TEMPLATE),
        "tags.html" => Some(TAGS_TEMPLATE),
        "tag.html" => Some(TAG_TEMPLATE),
        "item_list.html" => Some(ITEM_LIST_TEMPLATE),
        "tag_list.html" => Some(TAG_LIST_TEMPLATE),
        _ => None,
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ site.language }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title == site.name %}{{ title }}{% else %}{{ title }} | {{ site.name }}{% endif %}</title>
  <meta name="description" content="{{ description }}">
  <meta property="og:site_name" content="{{ site.name }}">
  <meta property="og:title" content="{{ title }}">
  <meta property="og:description" content="{{ description }}">
  <meta property="og:url" content="{{ url | safe }}">
  {% if site.image %}<meta property="og:image" content="{{ site.image | safe }}">
  <meta name="twitter:card" content="summary_large_image">
  {% endif %}<link rel="canonical" href="{{ url | safe }}">
  <link rel="stylesheet" href="{{ site.stylesheet | safe }}">
  <link rel="alternate" type="application/rss+xml" title="{{ site.name }}" href="{{ site.feed | safe }}">
</head>
<body{% if body_class %} class="{{ body_class }}"{% endif %}>
  <header>
    <div class="wrapper">
      <a href="{{ site.home | safe }}" class="site-name">{{ site.name }}</a>
      <nav>
        <ul>
        {% for link in site.nav %}
          <li><a href="{{ link.href | safe }}"{% if link.id == current %} class="selected"{% endif %}>{{ link.title }}</a></li>
        {% endfor %}
        </ul>
      </nav>
    </div>
  </header>
  <main class="wrapper">
    {% block content %}{% endblock %}
  </main>
  <footer>
    <p>Generated by blog</p>
    <p><a href="{{ site.feed | safe }}">RSS feed</a></p>
  </footer>
</body>
</html>
"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<div class="description">
  {% if intro %}{{ intro | safe }}{% else %}<p>{{ description }}</p>{% endif %}
</div>
<h2>Latest content</h2>
{% include "item_list.html" %}
{% endblock %}"##;

const SECTION_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<h1>{{ title }}</h1>
{% if intro %}<div class="description">{{ intro | safe }}</div>{% endif %}
{% include "item_list.html" %}
{% endblock %}"##;

const ITEM_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article>
  <div class="content">
    <h1>{{ item.title }}</h1>
    <p class="meta">
      <time datetime="{{ item.datetime }}">{{ item.date }}</time>
      in <a href="{{ item.section_href | safe }}">{{ item.section_title }}</a>
    </p>
    {{ item.content | safe }}
  </div>
  <span>Tagged with: </span>
  {% include "tag_list.html" %}
</article>
{% endblock %}"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<div class="content">
  {{ content | safe }}
</div>
{% endblock %}"##;

const TAGS_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<h1>Browse all tags</h1>
<ul class="all-tags">
{% for tag in tags %}
  <li class="tag"><a href="{{ tag.href | safe }}">{{ tag.name }}</a> <span class="count">{{ tag.count }}</span></li>
{% endfor %}
</ul>
{% endblock %}"##;

const TAG_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<h1>Tagged with <span class="tag">{{ tag }}</span></h1>
<a class="browse-all" href="{{ site.tags | safe }}">Browse all tags</a>
{% include "item_list.html" %}
{% endblock %}"##;

const ITEM_LIST_TEMPLATE: &str = r##"<ul class="item-list">
{% for item in items %}
  <li>
    <article>
      <h1><a href="{{ item.href | safe }}">{{ item.title }}</a></h1>
      <time datetime="{{ item.datetime }}">{{ item.date }}</time>
      {% include "tag_list.html" %}
      {% if item.description %}<p>{{ item.description }}</p>{% endif %}
    </article>
  </li>
{% endfor %}
</ul>"##;

const TAG_LIST_TEMPLATE: &str = r##"{% if item.tags %}<ul class="tag-list">{% for tag in item.tags %}<li><a href="{{ tag.href | safe }}">{{ tag.name }}</a></li>{% endfor %}</ul>{% endif %}"##;

const FOUNDATION_CSS: &str = r#"* {
  margin: 0;
  padding: 0;
  box-sizing: border-box;
}

body {
  background: #fff;
  color: #000;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
  line-height: 1.5;
  text-align: center;
}

.wrapper {
  max-width: 900px;
  margin-left: auto;
  margin-right: auto;
  padding: 40px;
  text-align: left;
}

header {
  background: #ededed;
  margin-bottom: 0;
  padding-bottom: 0;
}

header .wrapper {
  padding-top: 30px;
}

.site-name {
  color: #000;
  font-size: 2.2em;
  font-weight: bold;
  text-decoration: none;
}

nav {
  margin-top: 20px;
}

nav ul {
  list-style: none;
}

nav li {
  display: inline-block;
  margin: 0 7px;
  line-height: 1.5em;
}

nav a.selected {
  text-decoration: underline;
}

h1 {
  margin-bottom: 20px;
  font-size: 2em;
}

h2 {
  margin: 20px 0;
}

p {
  margin-bottom: 10px;
}

a {
  color: inherit;
}

.description {
  margin-bottom: 40px;
}

.meta {
  color: #666;
  margin-bottom: 20px;
}

.item-list > li {
  display: block;
  padding: 20px;
  border-radius: 20px;
  background: #ededed;
  margin-bottom: 20px;
}

.item-list > li:last-child {
  margin-bottom: 0;
}

.item-list h1 {
  margin-bottom: 10px;
  font-size: 1.5em;
}

.item-list time {
  color: #666;
  display: block;
  margin-bottom: 10px;
}

.tag-list {
  margin-bottom: 15px;
}

.tag-list li,
.tag {
  display: inline-block;
  background: #000;
  padding: 4px 8px;
  border-radius: 5px;
  margin-right: 5px;
}

.tag-list a,
.tag a {
  color: #fff;
  text-decoration: none;
}

.tag .count {
  color: #ccc;
  margin-left: 4px;
}

.all-tags li {
  font-size: 1.4em;
  margin: 0 15px 15px 0;
}

.browse-all {
  display: block;
  margin-bottom: 30px;
}

.content {
  margin-bottom: 40px;
}

.content img {
  max-width: 100%;
  border-radius: 10px;
}

.content pre {
  margin-bottom: 20px;
  padding: 10px;
  border-radius: 10px;
  overflow-x: auto;
  background: #f6f8fa;
}

.content ul,
.content ol {
  margin: 0 0 20px 20px;
}

.content blockquote {
  margin: 0 0 20px;
  padding-left: 15px;
  border-left: 4px solid #ddd;
  color: #555;
}

.content table {
  border-collapse: collapse;
  margin-bottom: 20px;
}

.content th,
.content td {
  border: 1px solid #ddd;
  padding: 6px 12px;
}

footer {
  color: #8f8f8f;
}

footer p {
  margin-bottom: 5px;
}

@media (prefers-color-scheme: dark) {
  body {
    background: #222;
    color: #ddd;
  }

  header,
  .item-list > li {
    background: #333;
  }

  .site-name {
    color: #ddd;
  }

  .tag-list li,
  .tag {
    background: #ddd;
  }

  .tag-list a,
  .tag a {
    color: #222;
  }

  .content pre {
    background: #2b2b2b;
  }
}

@media (max-width: 600px) {
  .wrapper {
    padding: 20px;
  }

  .site-name {
    font-size: 1.6em;
  }
}
"#;
