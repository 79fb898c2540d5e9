#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crosspost_engine::http::{Credentials, PageResponse, PageTransport, TransportError};
use crosspost_types::Settings;
use url::Url;

/// Answers every request with the same response and remembers what was asked.
pub struct FakeTransport {
    status: u16,
    body: String,
    calls: Mutex<Vec<(String, Credentials)>>,
}

impl FakeTransport {
    pub fn serving(body: &str) -> Arc<Self> {
        Arc::new(Self {
            status: 200,
            body: body.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: String::new(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, Credentials)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageTransport for FakeTransport {
    async fn get(&self, url: &Url, credentials: Credentials) -> Result<PageResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), credentials));

        let status_text = match self.status {
            200 => "OK",
            404 => "Not Found",
            _ => "Internal Server Error",
        };
        Ok(PageResponse {
            status: self.status,
            status_text: status_text.to_string(),
            redirected: false,
            body: self.body.clone(),
        })
    }
}

pub const WORK_URL: &str = "https://archiveofourown.org/works/4242";
pub const NEW_WORK_PAGE_URL: &str = "https://squidgeworld.org/works/new";
pub const NEW_CHAPTER_PAGE_URL: &str = "https://squidgeworld.org/works/77/chapters/new";

pub fn settings_for(url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.options.url = url.to_string();
    settings
}

const META: &str = r#"
    <dl class="work meta group">
      <dt class="rating tags">Rating:</dt>
      <dd class="rating tags"><ul class="commas"><li><a class="tag" href="/tags/General%20Audiences/works">General Audiences</a></li></ul></dd>
      <dt class="warning tags">Archive Warning:</dt>
      <dd class="warning tags"><ul class="commas"><li><a class="tag">{warning}</a></li></ul></dd>
      <dd class="category tags"><ul class="commas"><li><a class="tag">Gen</a></li></ul></dd>
      <dd class="fandom tags"><ul class="commas"><li><a class="tag">Original Work</a></li></ul></dd>
      <dd class="relationship tags"><ul class="commas"><li><a class="tag">Ash &amp; Rowan</a></li></ul></dd>
      <dd class="character tags"><ul class="commas">
        <li><a class="tag">Ash</a></li>
        <li><a class="tag">Rowan</a></li>
      </ul></dd>
      <dd class="freeform tags"><ul class="commas">
        <li><a class="tag">Fluff</a></li>
        <li><a class="tag">Podfic Welcome</a></li>
      </ul></dd>
      <dt class="language">Language:</dt>
      <dd class="language" lang="en">English</dd>
    </dl>
"#;

/// A single chapter work page as the source archive renders it with the
/// full work flags set.
pub fn one_shot_work(warning: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><div id="main">
        {meta}
        <div id="workskin">
          <div class="preface group">
            <h2 class="title heading">  Echoes </h2>
            <h3 class="byline heading">
              <a rel="author" href="/users/jun/pseuds/jun">Jun</a>
            </h3>
            <div class="summary module"><h3 class="heading">Summary:</h3>
              <blockquote class="userstuff"><p>It rings.</p></blockquote>
            </div>
            <div class="notes module"><h3 class="heading">Notes:</h3>
              <blockquote class="userstuff"><p>Thanks for reading.</p></blockquote>
            </div>
          </div>
          <div id="chapters" role="article">
            <h3 class="landmark heading" id="work">Work Text:</h3>
            <div class="userstuff"><p>Once upon a time.</p></div>
          </div>
        </div>
        </div></body></html>"#,
        meta = META.replace("{warning}", warning),
    )
}

fn chapter(n: usize) -> String {
    format!(
        r#"<div class="chapter" id="chapter-{n}">
          <div class="chapter preface group" role="complementary">
            <h3 class="title">Chapter {n}</h3>
            <div class="summary module"><blockquote class="userstuff"><p>Summary {n}</p></blockquote></div>
            <div class="notes module"><blockquote class="userstuff"><p>Notes {n}</p></blockquote></div>
          </div>
          <div class="userstuff module" role="article"><p>Text {n}</p></div>
          <div class="chapter preface group" role="complementary">
            <div class="end notes module"><blockquote class="userstuff"><p>End {n}</p></blockquote></div>
          </div>
        </div>"#
    )
}

/// A work with chapter wrappers and no work level notes.
pub fn multi_chapter_work(chapters: usize) -> String {
    let body = (1..=chapters).map(chapter).collect::<String>();
    format!(
        r#"<!DOCTYPE html><html><body><div id="main">
        {meta}
        <div id="workskin">
          <div class="preface group">
            <h2 class="title heading">Seasons</h2>
            <h3 class="byline heading"><a rel="author" href="/users/jun/pseuds/jun">Jun</a></h3>
          </div>
          <div id="chapters">{body}</div>
        </div>
        </div></body></html>"#,
        meta = META.replace("{warning}", "No Archive Warnings Apply"),
    )
}

/// The destination's new work form.
pub const NEW_WORK_FORM: &str = r#"<!DOCTYPE html><html><body><div id="main">
  <form class="post work" id="work-form">
    <dl>
      <dt class="rating">Rating</dt>
      <dd class="rating">
        <select id="work_rating_string" name="work[rating_string]">
          <option value="">Please select</option>
          <option value="Not Rated">Not Rated</option>
          <option value="General Audiences">General Audiences</option>
          <option value="Teen And Up Audiences">Teen And Up Audiences</option>
        </select>
      </dd>
      <dt class="warning">Archive Warnings</dt>
      <dd class="warning"><fieldset class="warnings"><ul>
        <li><input type="checkbox" name="work[archive_warning_strings][]" id="warning_cntu" value="Creator Chose Not To Use Archive Warnings"></li>
        <li><input type="checkbox" name="work[archive_warning_strings][]" id="warning_none" value="No Archive Warnings Apply"></li>
      </ul></fieldset></dd>
      <dd class="fandom"><input type="text" id="work_fandom" name="work[fandom_string]"></dd>
      <dd class="category"><ul>
        <li><input type="checkbox" id="category_gen" value="Gen"></li>
        <li><input type="checkbox" id="category_fm" value="F/M"></li>
      </ul></dd>
      <dd class="relationship"><input type="text" id="work_relationship" name="work[relationship_string]"></dd>
      <dd class="character"><input type="text" id="work_character" name="work[character_string]"></dd>
      <dd class="freeform"><input type="text" id="work_freeform" name="work[freeform_string]"></dd>
    </dl>
    <dl>
      <dd class="title"><input type="text" id="work_title" name="work[title]"></dd>
      <dd class="summary"><textarea id="work_summary" name="work[summary]"></textarea></dd>
      <dd class="notes">
        <input type="checkbox" id="front-notes-options-show">
        <textarea id="work_notes" name="work[notes]"></textarea>
        <input type="checkbox" id="end-notes-options-show">
        <textarea id="work_endnotes" name="work[endnotes]"></textarea>
      </dd>
      <dd class="language">
        <select id="work_language_id" name="work[language_id]">
          <option value="">Please select a language</option>
          <option value="1">English</option>
          <option value="4">Deutsch</option>
        </select>
      </dd>
    </dl>
    <textarea class="mce-editor observe_textlength" id="content" name="work[chapter_attributes][content]"></textarea>
  </form>
</div></body></html>"#;

/// The destination's new chapter form, positioned at `position`.
pub fn new_chapter_form(position: usize) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><div id="main">
  <form class="post chapter" id="chapter-form">
    <input type="text" id="chapter_position" name="chapter[position]" value="{position}">
    <textarea id="chapter_summary" name="chapter[summary]"></textarea>
    <input type="checkbox" id="front-notes-options-show">
    <textarea id="chapter_notes" name="chapter[notes]"></textarea>
    <input type="checkbox" id="end-notes-options-show">
    <textarea id="chapter_endnotes" name="chapter[endnotes]"></textarea>
    <textarea class="mce-editor" id="content" name="chapter[content]"></textarea>
  </form>
</div></body></html>"#
    )
}
