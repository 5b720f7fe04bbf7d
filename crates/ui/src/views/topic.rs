use std::path::PathBuf;

use dioxus::prelude::*;
use services::{PromptRequest, TextPrompt};
use study_core::model::{NewVideo, Pdf, TopicId, Video, VideoSource};

use crate::context::{AppContext, CurrentUser};
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct TopicContent {
    videos: Vec<Video>,
    pdfs: Vec<Pdf>,
}

fn video_badge(source: &VideoSource) -> &'static str {
    match source {
        VideoSource::YouTube(_) => "YouTube",
        VideoSource::Uploaded(_) => "Video",
    }
}

#[component]
pub fn TopicView(topic_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let current = use_context::<CurrentUser>();
    let id = TopicId::new(topic_id);
    let mut status = use_signal(|| None::<String>);

    let mut resource = {
        let catalog = ctx.catalog();
        let id = id.clone();
        use_resource(move || {
            let catalog = catalog.clone();
            let id = id.clone();
            async move {
                let videos = catalog.videos(&id).await.map_err(ViewError::from)?;
                let pdfs = catalog.pdfs(&id).await.map_err(ViewError::from)?;
                Ok::<_, ViewError>(TopicContent { videos, pdfs })
            }
        })
    };

    let open_video = {
        let opener = ctx.link_opener();
        use_callback(move |video: Video| opener.open_url(video.source.url().as_str()))
    };

    let open_pdf = {
        let catalog = ctx.catalog();
        let opener = ctx.link_opener();
        use_callback(move |pdf: Pdf| {
            let catalog = catalog.clone();
            let opener = opener.clone();
            status.set(Some(format!("Downloading {}...", pdf.title)));
            spawn(async move {
                match catalog.download_pdf(&pdf).await {
                    Ok(path) => {
                        status.set(None);
                        opener.open_path(&path);
                    }
                    Err(err) => status.set(Some(err.to_string())),
                }
            });
        })
    };

    let add_video = {
        let catalog = ctx.catalog();
        let prompt = ctx.prompt();
        let id = id.clone();
        use_callback(move |()| {
            let catalog = catalog.clone();
            let prompt = prompt.clone();
            let id = id.clone();
            spawn(async move {
                let Some(title) = prompt
                    .request_text(PromptRequest::new("Add video", "Title"))
                    .await
                else {
                    return;
                };
                let Some(link) = prompt
                    .request_text(
                        PromptRequest::new("Add video", "YouTube link")
                            .with_placeholder("https://www.youtube.com/watch?v=..."),
                    )
                    .await
                else {
                    return;
                };
                let created = match NewVideo::new(id, &title, "", &link) {
                    Ok(video) => catalog.add_video(&video).await.map(|_| ()),
                    Err(err) => Err(err.into()),
                };
                match created {
                    Ok(()) => {
                        status.set(Some(format!("Added \"{title}\".")));
                        resource.restart();
                    }
                    Err(err) => status.set(Some(err.to_string())),
                }
            });
        })
    };

    let add_pdf = {
        let catalog = ctx.catalog();
        let prompt = ctx.prompt();
        use_callback(move |()| {
            let catalog = catalog.clone();
            let prompt = prompt.clone();
            let id = id.clone();
            spawn(async move {
                let Some(title) = prompt
                    .request_text(PromptRequest::new("Upload PDF", "Title"))
                    .await
                else {
                    return;
                };
                let Some(path) = prompt
                    .request_text(
                        PromptRequest::new("Upload PDF", "Path to the PDF file")
                            .with_placeholder("/home/me/notes.pdf"),
                    )
                    .await
                else {
                    return;
                };
                let path = PathBuf::from(path);
                let uploaded = match catalog.read_pdf_file(id, &title, "", &path).await {
                    Ok(pdf) => catalog.add_pdf(&pdf).await.map(|_| ()),
                    Err(err) => Err(err),
                };
                match uploaded {
                    Ok(()) => {
                        status.set(Some(format!("Uploaded \"{title}\".")));
                        resource.restart();
                    }
                    Err(err) => status.set(Some(err.to_string())),
                }
            });
        })
    };

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            div { class: "section-header",
                h2 { "Study material" }
                if current.can_author() {
                    div { class: "actions",
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| add_video.call(()),
                            "Add video"
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| add_pdf.call(()),
                            "Upload PDF"
                        }
                    }
                }
            }
            if let Some(message) = status() {
                p { class: "status", "{message}" }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(content) => rsx! {
                    h3 { "Videos" }
                    if content.videos.is_empty() {
                        p { "No videos yet." }
                    } else {
                        ul { class: "material-list",
                            for video in content.videos {
                                li { key: "{video.id}",
                                    span { class: "badge", "{video_badge(&video.source)}" }
                                    span { class: "material-title", "{video.title}" }
                                    button {
                                        class: "btn btn-link",
                                        r#type: "button",
                                        onclick: {
                                            let video = video.clone();
                                            move |_| open_video.call(video.clone())
                                        },
                                        "Watch"
                                    }
                                }
                            }
                        }
                    }
                    h3 { "Notes" }
                    if content.pdfs.is_empty() {
                        p { "No PDFs yet." }
                    } else {
                        ul { class: "material-list",
                            for pdf in content.pdfs {
                                li { key: "{pdf.id}",
                                    span { class: "badge", "PDF" }
                                    span { class: "material-title", "{pdf.title}" }
                                    button {
                                        class: "btn btn-link",
                                        r#type: "button",
                                        onclick: {
                                            let pdf = pdf.clone();
                                            move |_| open_pdf.call(pdf.clone())
                                        },
                                        "Open"
                                    }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}
