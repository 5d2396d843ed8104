use std::str::FromStr;

use async_stream::try_stream;
use futures::{Stream, TryStreamExt};

use crate::error::{Error, Result};
use crate::shared::QueryConnection;
use crate::shared::clip::{AnnotatedClip, TwitchClip};

/// Supplies one page of a video's clip connection at a time. Implemented by
/// [`crate::TwitchGqlClient`]; tests swap in an in-memory source.
pub trait ClipPageSource {
    async fn initial_page(&self, video_id: &str) -> Result<QueryConnection<TwitchClip>>;

    async fn next_page(
        &self,
        video_id: &str,
        after: &str,
    ) -> Result<QueryConnection<TwitchClip>>;
}

/// The clip field an aggregation is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Offset into the source video, earliest first.
    Chrono,
    /// View count.
    Popular,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chrono" => Ok(Self::Chrono),
            "popular" => Ok(Self::Popular),
            other => Err(Error::UnknownSortKey(other.to_string())),
        }
    }
}

/// Walks a video's clip connection page by page, yielding nodes in server
/// order. The next page is fetched only once the current one is drained, so
/// dropping the stream early wastes at most the page already requested.
///
/// A failure ends the stream, but items yielded before it are not retracted.
/// Callers that need all-or-nothing semantics should collect first, as
/// [`collect_clips`] does.
pub fn clip_stream<'a, S: ClipPageSource>(
    source: &'a S,
    video_id: &'a str,
) -> impl Stream<Item = Result<TwitchClip>> + 'a {
    try_stream! {
        let mut connection = source.initial_page(video_id).await?;

        loop {
            let has_next_page = connection.page_info.has_next_page;

            let mut cursor = None;
            for edge in connection.edges {
                cursor = edge.cursor;
                yield edge.node;
            }

            if !has_next_page {
                break;
            }

            // More pages without a cursor to reach them is a protocol bug;
            // bail instead of refetching the first page forever.
            let after = cursor.ok_or(Error::MissingPageCursor)?;
            connection = source.next_page(video_id, &after).await?;
        }
    }
}

/// Walks the full clip connection, sorts by the selected key and annotates
/// every clip with its formatted offset. Returns the complete list or the
/// first failure, never a partial list.
pub async fn collect_clips<S: ClipPageSource>(
    source: &S,
    video_id: &str,
    sort: SortKey,
    reversed: bool,
) -> Result<Vec<AnnotatedClip>> {
    let mut clips: Vec<TwitchClip> = clip_stream(source, video_id).try_collect().await?;

    clips.sort_by_key(|clip| match sort {
        SortKey::Chrono => clip.video_offset_seconds,
        SortKey::Popular => clip.view_count,
    });
    if reversed {
        clips.reverse();
    }

    Ok(clips.into_iter().map(AnnotatedClip::from).collect())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::{StreamExt as _, pin_mut};

    use super::*;
    use crate::shared::{QueryEdge, QueryPageInfo};

    struct FakePageSource {
        pages: Mutex<VecDeque<QueryConnection<TwitchClip>>>,
        fetches: AtomicUsize,
    }
    impl FakePageSource {
        fn new(pages: Vec<QueryConnection<TwitchClip>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                fetches: AtomicUsize::new(0),
            }
        }

        fn serve(&self) -> Result<QueryConnection<TwitchClip>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);

            Ok(self
                .pages
                .lock()
                .unwrap()
                .pop_front()
                .expect("requested a page past the scripted ones"))
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }
    impl ClipPageSource for FakePageSource {
        async fn initial_page(&self, _: &str) -> Result<QueryConnection<TwitchClip>> {
            self.serve()
        }

        async fn next_page(&self, _: &str, _: &str) -> Result<QueryConnection<TwitchClip>> {
            self.serve()
        }
    }

    fn clip(id: &str, offset: u64, views: u64) -> TwitchClip {
        TwitchClip {
            title: format!("clip {id}"),
            id: id.to_string(),
            url: format!("https://clips.example/{id}"),
            embed_url: format!("https://clips.example/embed/{id}"),
            video_offset_seconds: offset,
            view_count: views,
        }
    }

    fn page(clips: Vec<TwitchClip>, has_next_page: bool) -> QueryConnection<TwitchClip> {
        let edges = clips
            .into_iter()
            .map(|node| QueryEdge {
                cursor: Some(format!("cur-{}", node.id)),
                node,
            })
            .collect();

        QueryConnection {
            edges,
            page_info: QueryPageInfo { has_next_page },
        }
    }

    #[tokio::test]
    async fn walks_every_page_in_server_order() {
        let source = FakePageSource::new(vec![
            page(vec![clip("a", 30, 5), clip("b", 10, 1)], true),
            page(vec![clip("c", 20, 9)], false),
        ]);

        let clips: Vec<_> = clip_stream(&source, "123")
            .try_collect()
            .await
            .unwrap();

        assert_eq!(source.fetches(), 2);
        let ids: Vec<_> = clips.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn stops_fetching_when_the_consumer_stops() {
        let source = FakePageSource::new(vec![
            page(vec![clip("a", 30, 5), clip("b", 10, 1)], true),
            page(vec![clip("c", 20, 9)], false),
        ]);

        let stream = clip_stream(&source, "123");
        pin_mut!(stream);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.id, "a");
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn next_page_without_edges_is_fatal() {
        let source = FakePageSource::new(vec![page(vec![], true)]);

        let err = collect_clips(&source, "123", SortKey::Chrono, false)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingPageCursor));
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn chrono_sorts_ascending_and_annotates_everything() {
        let source = FakePageSource::new(vec![
            page(vec![clip("a", 3661, 5), clip("b", 0, 1)], true),
            page(vec![clip("c", 42, 9)], false),
        ]);

        let clips = collect_clips(&source, "123", SortKey::Chrono, false)
            .await
            .unwrap();

        assert_eq!(clips.len(), 3);
        let offsets: Vec<_> = clips.iter().map(|c| c.clip.video_offset_seconds).collect();
        assert_eq!(offsets, [0, 42, 3661]);

        let stamps: Vec<_> = clips.iter().map(|c| c.formatted_timestamp.as_str()).collect();
        assert_eq!(stamps, ["00h00m00s", "00h00m42s", "01h01m01s"]);
    }

    #[tokio::test]
    async fn popular_reversed_sorts_by_views_descending() {
        let source = FakePageSource::new(vec![page(
            vec![clip("a", 1, 5), clip("b", 2, 1), clip("c", 3, 9)],
            false,
        )]);

        let clips = collect_clips(&source, "123", SortKey::Popular, true)
            .await
            .unwrap();

        let views: Vec<_> = clips.iter().map(|c| c.clip.view_count).collect();
        assert_eq!(views, [9, 5, 1]);
    }

    #[test]
    fn unknown_sort_key_is_rejected_before_any_fetch() {
        let source = FakePageSource::new(vec![]);

        let err = "bogus".parse::<SortKey>().unwrap_err();

        assert!(matches!(err, Error::UnknownSortKey(key) if key == "bogus"));
        assert_eq!(source.fetches(), 0);
    }
}
