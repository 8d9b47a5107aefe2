use askama::Template;

use crate::models::download::{DownloadForm, DownloadRow};
use crate::models::event::{EventForm, EventRow};
use crate::models::gallery::{GalleryForm, GalleryRow};
use crate::models::listing::SelectOption;
use crate::models::news::{NewsForm, NewsRow};
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "events/list.html")]
pub struct EventListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<EventRow>,
}

#[derive(Template)]
#[template(path = "events/form.html")]
pub struct EventFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: EventForm,
    pub status_options: Vec<SelectOption>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "news/list.html")]
pub struct NewsListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<NewsRow>,
}

#[derive(Template)]
#[template(path = "news/form.html")]
pub struct NewsFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: NewsForm,
    pub status_options: Vec<SelectOption>,
    pub current_image: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "gallery/list.html")]
pub struct GalleryListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<GalleryRow>,
}

#[derive(Template)]
#[template(path = "gallery/form.html")]
pub struct GalleryFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: GalleryForm,
    pub is_new: bool,
    pub current_file: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "downloads/list.html")]
pub struct DownloadListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<DownloadRow>,
}

#[derive(Template)]
#[template(path = "downloads/form.html")]
pub struct DownloadFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: DownloadForm,
    pub is_new: bool,
    pub current_file: String,
    pub errors: Vec<String>,
}
