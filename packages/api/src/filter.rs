//! # Records filter reconciler
//!
//! The backend's list query accepts at most one `type` and one `status`
//! value per call, while the filter panel lets the user pick several of
//! each. [`RecordFilters::reconcile`] bridges the two: a dimension with
//! exactly one selected value is sent as a server parameter, a dimension
//! with two or more is *demoted* — omitted from the query and re-applied
//! client-side over the page the server returns. Participant and tag
//! filters are multi-valued at the protocol level and always go to the
//! server as comma-joined id lists.
//!
//! When any dimension was demoted, the corrected total is the length of
//! the post-filtered page, not the server-reported total. The true count
//! across all pages is not recomputed; a page may therefore show fewer
//! than `page_size` rows while later unfetched pages still hold matches.
//! This approximation is deliberate and part of the contract.
//!
//! Date ranges are inclusive on both ends: the start date is sent as the
//! first instant of its day, the end date as `23:59:59.999` of its day.

use chrono::{NaiveDate, NaiveTime};

use crate::models::{Page, Record, RecordStatus, RecordType};

/// Everything the user can constrain the records list by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilters {
    /// Free-text search, matched server-side against titles.
    pub search: String,
    pub types: Vec<RecordType>,
    pub statuses: Vec<RecordStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub field_id: Option<i64>,
    pub participant_ids: Vec<i64>,
    pub tag_ids: Vec<i64>,
}

impl RecordFilters {
    /// Whether any filter dimension (search excluded) is active.
    pub fn is_active(&self) -> bool {
        !self.types.is_empty()
            || !self.statuses.is_empty()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.field_id.is_some()
            || !self.participant_ids.is_empty()
            || !self.tag_ids.is_empty()
    }

    /// Split the filter state into the query actually sent to the backend
    /// and the predicate re-applied over the returned page.
    pub fn reconcile(&self, page: u32, page_size: u32) -> ReconciledQuery {
        let mut params: Vec<(String, String)> = vec![
            ("skip".into(), (page as u64 * page_size as u64).to_string()),
            ("limit".into(), page_size.to_string()),
        ];

        if !self.search.is_empty() {
            params.push(("search".into(), self.search.clone()));
        }

        // Single value goes to the server; two or more are demoted to a
        // client-side post-filter because the protocol takes one value.
        let mut demoted_types = None;
        match self.types.len() {
            0 => {}
            1 => params.push(("type".into(), self.types[0].as_str().to_string())),
            _ => demoted_types = Some(self.types.clone()),
        }

        let mut demoted_statuses = None;
        match self.statuses.len() {
            0 => {}
            1 => params.push(("status".into(), self.statuses[0].as_str().to_string())),
            _ => demoted_statuses = Some(self.statuses.clone()),
        }

        if let Some(start) = self.start_date {
            params.push(("start_date".into(), format_timestamp(start, start_of_day())));
        }
        if let Some(end) = self.end_date {
            // Inclusive of the whole end day.
            params.push(("end_date".into(), format_timestamp(end, end_of_day())));
        }

        if let Some(field_id) = self.field_id {
            params.push(("field_id".into(), field_id.to_string()));
        }
        if !self.participant_ids.is_empty() {
            params.push(("participant_ids".into(), join_ids(&self.participant_ids)));
        }
        if !self.tag_ids.is_empty() {
            params.push(("tag_ids".into(), join_ids(&self.tag_ids)));
        }

        ReconciledQuery {
            params,
            demoted_types,
            demoted_statuses,
        }
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn start_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
}

fn format_timestamp(date: NaiveDate, time: NaiveTime) -> String {
    date.and_time(time).format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

/// The outcome of reconciling filter state against the backend's query
/// contract: the outgoing parameters plus any demoted dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledQuery {
    pub params: Vec<(String, String)>,
    demoted_types: Option<Vec<RecordType>>,
    demoted_statuses: Option<Vec<RecordStatus>>,
}

impl ReconciledQuery {
    /// True when some dimension could not be expressed server-side.
    pub fn demoted(&self) -> bool {
        self.demoted_types.is_some() || self.demoted_statuses.is_some()
    }

    /// Conjunction of all demoted dimensions for a single record.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(types) = &self.demoted_types {
            if !types.contains(&record.record_type) {
                return false;
            }
        }
        if let Some(statuses) = &self.demoted_statuses {
            if !statuses.contains(&record.status) {
                return false;
            }
        }
        true
    }

    /// Apply the post-filter to a returned page and correct the total.
    ///
    /// Without demotion the page passes through untouched. With demotion
    /// the total becomes the post-filtered page length (see module docs).
    pub fn apply(&self, page: Page<Record>) -> (Vec<Record>, u64) {
        if !self.demoted() {
            return (page.items, page.total);
        }
        let items: Vec<Record> = page
            .items
            .into_iter()
            .filter(|r| self.matches(r))
            .collect();
        let total = items.len() as u64;
        (items, total)
    }

    #[cfg(test)]
    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Filter state plus pagination, as held by the records view.
///
/// Every filter mutation goes through a setter so the page index reliably
/// resets to 0: result membership and ordering may shift under any change.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordListState {
    pub filters: RecordFilters,
    pub page: u32,
    pub page_size: u32,
}

impl Default for RecordListState {
    fn default() -> Self {
        Self {
            filters: RecordFilters::default(),
            page: 0,
            page_size: 10,
        }
    }
}

impl RecordListState {
    pub fn query(&self) -> ReconciledQuery {
        self.filters.reconcile(self.page, self.page_size)
    }

    pub fn set_search(&mut self, search: String) {
        self.filters.search = search;
        self.page = 0;
    }

    pub fn set_types(&mut self, types: Vec<RecordType>) {
        self.filters.types = types;
        self.page = 0;
    }

    pub fn set_statuses(&mut self, statuses: Vec<RecordStatus>) {
        self.filters.statuses = statuses;
        self.page = 0;
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.filters.start_date = date;
        self.page = 0;
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.filters.end_date = date;
        self.page = 0;
    }

    pub fn set_field(&mut self, field_id: Option<i64>) {
        self.filters.field_id = field_id;
        self.page = 0;
    }

    pub fn set_participants(&mut self, ids: Vec<i64>) {
        self.filters.participant_ids = ids;
        self.page = 0;
    }

    pub fn set_tags(&mut self, ids: Vec<i64>) {
        self.filters.tag_ids = ids;
        self.page = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filters = RecordFilters {
            search: self.filters.search.clone(),
            ..RecordFilters::default()
        };
        self.page = 0;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, record_type: RecordType, status: RecordStatus) -> Record {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("record {id}"),
            "type": record_type.as_str(),
            "record_date": "2024-03-01T10:00:00",
            "status": status.as_str(),
            "created_by": 1,
            "created_at": "2024-03-01T10:00:00",
            "updated_at": "2024-03-01T10:00:00"
        }))
        .unwrap()
    }

    fn page(items: Vec<Record>, total: u64) -> Page<Record> {
        Page {
            items,
            total,
            skip: 0,
            limit: 10,
        }
    }

    #[test]
    fn single_type_goes_to_server_without_post_filter() {
        let filters = RecordFilters {
            types: vec![RecordType::Interview],
            ..Default::default()
        };
        let q = filters.reconcile(0, 10);
        assert_eq!(q.param("type"), Some("interview"));
        assert!(!q.demoted());

        // Passthrough: server result is not re-filtered.
        let items = vec![record(1, RecordType::Interview, RecordStatus::Draft)];
        let (shown, total) = q.apply(page(items, 42));
        assert_eq!(shown.len(), 1);
        assert_eq!(total, 42);
    }

    #[test]
    fn multiple_types_are_demoted_to_post_filter() {
        let filters = RecordFilters {
            types: vec![RecordType::Interview, RecordType::Observation],
            ..Default::default()
        };
        let q = filters.reconcile(0, 10);
        assert_eq!(q.param("type"), None);
        assert!(q.demoted());

        for t in RecordType::ALL {
            let r = record(1, t, RecordStatus::Draft);
            assert_eq!(
                q.matches(&r),
                t == RecordType::Interview || t == RecordType::Observation,
                "membership must equal value-in-selected-set for {t:?}"
            );
        }
    }

    #[test]
    fn mixed_page_is_post_filtered_and_total_corrected() {
        // Ten records spanning every type; only interview/observation are
        // selected, so only those survive and the total becomes their count.
        let filters = RecordFilters {
            types: vec![RecordType::Interview, RecordType::Observation],
            ..Default::default()
        };
        let q = filters.reconcile(0, 10);

        let mut items = Vec::new();
        for id in 0..10 {
            let t = RecordType::ALL[(id % 4) as usize];
            items.push(record(id, t, RecordStatus::Draft));
        }
        let expected: Vec<i64> = items
            .iter()
            .filter(|r| {
                r.record_type == RecordType::Interview
                    || r.record_type == RecordType::Observation
            })
            .map(|r| r.id)
            .collect();

        let (shown, total) = q.apply(page(items, 10));
        assert_eq!(shown.iter().map(|r| r.id).collect::<Vec<_>>(), expected);
        assert_eq!(total, expected.len() as u64);
        assert_ne!(total, 10);
    }

    #[test]
    fn demoted_statuses_combine_with_server_side_type() {
        let filters = RecordFilters {
            types: vec![RecordType::Interview],
            statuses: vec![RecordStatus::Draft, RecordStatus::Completed],
            ..Default::default()
        };
        let q = filters.reconcile(0, 10);
        assert_eq!(q.param("type"), Some("interview"));
        assert_eq!(q.param("status"), None);
        assert!(q.demoted());

        let keep = record(1, RecordType::Interview, RecordStatus::Draft);
        let drop = record(2, RecordType::Interview, RecordStatus::Archived);
        let (shown, total) = q.apply(page(vec![keep, drop], 2));
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, 1);
        assert_eq!(total, 1);
    }

    #[test]
    fn no_selection_means_no_constraint() {
        let q = RecordFilters::default().reconcile(0, 25);
        assert_eq!(q.param("type"), None);
        assert_eq!(q.param("status"), None);
        assert_eq!(q.param("search"), None);
        assert_eq!(q.param("skip"), Some("0"));
        assert_eq!(q.param("limit"), Some("25"));
        assert!(!q.demoted());
    }

    #[test]
    fn end_date_is_normalized_to_last_instant_of_day() {
        let filters = RecordFilters {
            end_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            ..Default::default()
        };
        let q = filters.reconcile(0, 10);
        assert_eq!(q.param("end_date"), Some("2024-03-15T23:59:59.999"));
    }

    #[test]
    fn start_date_is_sent_as_start_of_day() {
        let filters = RecordFilters {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        let q = filters.reconcile(0, 10);
        assert_eq!(q.param("start_date"), Some("2024-03-01T00:00:00.000"));
    }

    #[test]
    fn reference_filters_are_comma_joined() {
        let filters = RecordFilters {
            participant_ids: vec![1, 2, 3],
            tag_ids: vec![9],
            field_id: Some(4),
            ..Default::default()
        };
        let q = filters.reconcile(0, 10);
        assert_eq!(q.param("participant_ids"), Some("1,2,3"));
        assert_eq!(q.param("tag_ids"), Some("9"));
        assert_eq!(q.param("field_id"), Some("4"));
        assert!(!q.demoted());
    }

    #[test]
    fn pagination_is_expressed_as_skip_and_limit() {
        let q = RecordFilters::default().reconcile(3, 25);
        assert_eq!(q.param("skip"), Some("75"));
        assert_eq!(q.param("limit"), Some("25"));
    }

    #[test]
    fn every_filter_mutation_resets_the_page() {
        let mut state = RecordListState::default();

        let mutations: Vec<Box<dyn Fn(&mut RecordListState)>> = vec![
            Box::new(|s| s.set_search("market".into())),
            Box::new(|s| s.set_types(vec![RecordType::Other])),
            Box::new(|s| s.set_statuses(vec![RecordStatus::Draft])),
            Box::new(|s| s.set_start_date(NaiveDate::from_ymd_opt(2024, 1, 1))),
            Box::new(|s| s.set_end_date(NaiveDate::from_ymd_opt(2024, 2, 1))),
            Box::new(|s| s.set_field(Some(7))),
            Box::new(|s| s.set_participants(vec![1])),
            Box::new(|s| s.set_tags(vec![2])),
            Box::new(|s| s.clear_filters()),
            Box::new(|s| s.set_page_size(50)),
        ];

        for mutate in mutations {
            state.set_page(5);
            mutate(&mut state);
            assert_eq!(state.page, 0);
        }
    }

    #[test]
    fn clear_filters_keeps_search_text() {
        let mut state = RecordListState::default();
        state.set_search("ritual".into());
        state.set_types(vec![RecordType::Interview, RecordType::Other]);
        state.set_tags(vec![1, 2]);

        state.clear_filters();
        assert_eq!(state.filters.search, "ritual");
        assert!(!state.filters.is_active());
    }
}
