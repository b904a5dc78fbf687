//! Key-level query entry points.
//!
//! Callers that hold domain identifiers rather than node ids go through
//! this facade: keys are resolved against the graph's interning map
//! (unknown keys are skipped with a warning), the query runs, and the
//! result comes back as a key set. The facade carries the query
//! configuration: a caller passing `None` for a limit gets the
//! configured default, and shortest+k searches use the configured
//! search ceiling.

use std::collections::HashSet;

use crate::config::QueryConfig;
use crate::error::Result;
use crate::graph::{Direction, Graph};
use crate::query::common_stream::CommonStreamQuery;
use crate::query::neighborhood::NeighborhoodQuery;
use crate::query::paths_between::PathsBetweenQuery;
use crate::query::poi::{LimitType, PoiQuery};

pub struct QueryExecuter<'a> {
    graph: &'a Graph,
    config: QueryConfig,
}

impl<'a> QueryExecuter<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self::with_config(graph, QueryConfig::default())
    }

    pub fn with_config(graph: &'a Graph, config: QueryConfig) -> Self {
        QueryExecuter { graph, config }
    }

    fn limit(&self, limit: Option<u32>) -> u32 {
        limit.unwrap_or(self.config.default_limit)
    }

    /// Neighborhood of the given entities, as keys.
    pub fn neighborhood<'k>(
        &self,
        source_keys: impl IntoIterator<Item = &'k str>,
        limit: Option<u32>,
        upstream: bool,
        downstream: bool,
    ) -> Result<HashSet<String>> {
        let sources = self.graph.wrapper_set(source_keys);
        let result =
            NeighborhoodQuery::new(self.graph, &sources, upstream, downstream, self.limit(limit))
                .run()?;
        Ok(self.graph.unwrap_keys(&result))
    }

    /// Paths of interest from sources to targets, as keys. Paths through
    /// interior members of the opposite endpoint set are excluded.
    pub fn poi<'k>(
        &self,
        source_keys: impl IntoIterator<Item = &'k str>,
        target_keys: impl IntoIterator<Item = &'k str>,
        limit_type: LimitType,
        limit: Option<u32>,
    ) -> Result<HashSet<String>> {
        let sources = self.graph.wrapper_set(source_keys);
        let targets = self.graph.wrapper_set(target_keys);
        let result = PoiQuery::new(
            self.graph,
            &sources,
            &targets,
            limit_type,
            self.limit(limit),
            true,
        )
        .with_config(&self.config)
        .run()?;
        Ok(self.graph.unwrap_keys(&result))
    }

    /// Graph of interest: paths among the members of a single entity
    /// set, run as a paths-of-interest query with the set on both ends.
    pub fn goi<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k str>,
        limit: Option<u32>,
    ) -> Result<HashSet<String>> {
        let set = self.graph.wrapper_set(keys);
        let result = PoiQuery::new(
            self.graph,
            &set,
            &set,
            LimitType::Normal,
            self.limit(limit),
            true,
        )
        .with_config(&self.config)
        .run()?;
        Ok(self.graph.unwrap_keys(&result))
    }

    /// Common stream of the given entities, each as its own group.
    pub fn common_stream<'k>(
        &self,
        source_keys: impl IntoIterator<Item = &'k str>,
        direction: Direction,
        limit: Option<u32>,
    ) -> Result<HashSet<String>> {
        let sources = self.graph.wrapper_set(source_keys);
        let result =
            CommonStreamQuery::from_nodes(self.graph, &sources, direction, self.limit(limit))?
                .run()?;
        Ok(self.graph.unwrap_keys(&result))
    }

    /// Common stream plus the paths connecting the query entities to it.
    ///
    /// After finding the common stream nodes, a paths-of-interest query
    /// runs between the sources and the stream, oriented by the query
    /// direction: downstream the sources lead to the stream, upstream
    /// the stream leads to the sources.
    pub fn common_stream_with_poi<'k>(
        &self,
        source_keys: impl IntoIterator<Item = &'k str>,
        direction: Direction,
        limit: Option<u32>,
    ) -> Result<HashSet<String>> {
        let limit = self.limit(limit);
        let sources = self.graph.wrapper_set(source_keys);
        let stream =
            CommonStreamQuery::from_nodes(self.graph, &sources, direction, limit)?.run_nodes()?;

        let (from, to) = match direction {
            Direction::Downstream => (&sources, &stream),
            Direction::Upstream | Direction::Bothstream => (&stream, &sources),
        };
        let result = PoiQuery::new(self.graph, from, to, LimitType::Normal, limit, true)
            .with_config(&self.config)
            .run()?;
        Ok(self.graph.unwrap_keys(&result))
    }

    /// Paths between the given entities, each as its own group.
    pub fn paths_between<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k str>,
        limit: Option<u32>,
    ) -> Result<HashSet<String>> {
        let set = self.graph.wrapper_set(keys);
        let result = PathsBetweenQuery::from_nodes(self.graph, &set, self.limit(limit)).run()?;
        Ok(self.graph.unwrap_keys(&result))
    }
}
