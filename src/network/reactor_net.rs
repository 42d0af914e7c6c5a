use super::traits::{Conn, ZeroD};
use crate::error::{Result, SimError};
use crate::{BasicProperties, ObjectInfo, ObjectType, WallFlux};
use ndarray::*;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Set of zero-dimensional objects coupled by walls, advanced together in time.
///
/// Every call to [`ReactorNet::advance`] stores the state of every object, so the
/// whole history can be written to a file afterwards. The initial state is stored at
/// construction.
#[derive(Clone)]
pub struct ReactorNet {
    objs_info: Vec<ObjectInfo>,
    zero_dim: Vec<Box<dyn ZeroD>>,
    connector: Vec<Box<dyn Conn>>,
    zero_dim_links: Vec<Vec<(usize, usize)>>, // (connector index, side) per zero_dim object
    connector_objects_index: Vec<Vec<usize>>, // zero_dim indexes per connector
    time: f64,
    stored_time: Vec<f64>,
}

impl ReactorNet {
    pub(crate) fn new(
        objs_info: Vec<ObjectInfo>,
        zero_dim: Vec<Box<dyn ZeroD>>,
        connector: Vec<Box<dyn Conn>>,
    ) -> Result<ReactorNet> {
        let mut net = ReactorNet {
            objs_info,
            zero_dim,
            connector,
            zero_dim_links: Vec::new(),
            connector_objects_index: Vec::new(),
            time: 0.0,
            stored_time: Vec::new(),
        };
        net.setup_indexes()?;
        net.store_data();
        info!(
            "reactor network built: {} zero-dimensional objects, {} walls",
            net.zero_dim.len(),
            net.connector.len()
        );
        Ok(net)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advances every object by `dt` seconds. On error the network keeps its previous state.
    pub fn advance(&mut self, dt: f64) -> Result<&mut Self> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimError::Config(format!("time step must be positive: {}", dt)));
        }

        // Update connectors: require `basic_properties` of the connected objects
        let mut connectors = self.connector.clone();
        for (connector, obj_indexes) in connectors.iter_mut().zip(self.connector_objects_index.iter()) {
            let basic_properties: Vec<BasicProperties> = obj_indexes
                .iter()
                .map(|i| self.zero_dim[*i].get_state())
                .collect();
            connector.update_state(basic_properties, self.time);
        }

        // Advance ZeroDim objects: walls are evaluated at the integrator's sub-steps
        let mut advanced: Vec<Box<dyn ZeroD>> = Vec::with_capacity(self.zero_dim.len());
        for (zero_dim, links) in self.zero_dim.iter().zip(self.zero_dim_links.iter()) {
            let flux = |t: f64| -> WallFlux {
                links
                    .iter()
                    .fold(WallFlux::new(), |sum, (conn, side)| sum + connectors[*conn].flux_at(*side, t))
            };
            let mut next = zero_dim.clone();
            next.advance(self.time, dt, &flux)?;
            advanced.push(next);
        }

        self.connector = connectors;
        self.zero_dim = advanced;
        self.time += dt;
        self.store_data();
        debug!("advanced to t = {:.6e} s", self.time);
        Ok(self)
    }

    /// Advances with steps of at most `dt` until `end_time` is reached
    pub fn advance_to(&mut self, end_time: f64, dt: f64) -> Result<&mut Self> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimError::Config(format!("time step must be positive: {}", dt)));
        }
        for target in step_targets(self.time, end_time, dt) {
            let step = target - self.time;
            self.advance(step)?;
        }
        Ok(self)
    }

    pub fn get_state(&self, obj_name: &str) -> Result<BasicProperties<'_>> {
        let info = self.find(obj_name)?;
        match info.obj_type {
            ObjectType::ZeroDim => Ok(self.zero_dim[info.index].get_state()),
            ObjectType::Connector => Err(SimError::connection(
                obj_name,
                "a wall has no thermodynamic state",
            )),
        }
    }

    /// Stored times, one per stored row
    pub fn stored_time(&self) -> &Vec<f64> {
        &self.stored_time
    }

    /// Tab separated headers of the history of `obj_name`, time first
    pub fn headers(&self, obj_name: &str) -> Result<String> {
        let info = self.find(obj_name)?;
        Ok(format!("time [s]\t{}", info.stored.headers))
    }

    /// History of `obj_name`: one row per stored time, time in the first column
    pub fn history(&self, obj_name: &str) -> Result<Array2<f64>> {
        let info = self.find(obj_name)?;
        let cols = info.stored.num_variables + 1;
        let mut history = Array2::zeros((self.stored_time.len(), cols));
        for (mut row, (t, data)) in history
            .axis_iter_mut(Axis(0))
            .zip(self.stored_time.iter().zip(info.stored.data.iter()))
        {
            row[0] = *t;
            row.slice_mut(s![1..]).assign(data);
        }
        Ok(history)
    }

    /// Writes the history of `obj_name` as tab separated values. `range` selects rows `[start, end)`.
    pub fn write_to_file(
        &self,
        file_name: impl AsRef<Path>,
        obj_name: &str,
        range: Option<(usize, usize)>,
    ) -> Result<()> {
        let file_name = file_name.as_ref();
        let history = self.history(obj_name)?;
        let (start, end) = match range {
            Some((start, end)) => (start.min(history.nrows()), end.min(history.nrows())),
            None => (0, history.nrows()),
        };

        let mut result: Vec<String> = Vec::with_capacity(end.saturating_sub(start) + 1);
        result.push(format!("{}\n", self.headers(obj_name)?));
        for row in history.slice(s![start..end.max(start), ..]).axis_iter(Axis(0)) {
            let line: Vec<String> = row.iter().map(|v| format!("{}", v)).collect();
            result.push(format!("{}\n", line.join("\t")));
        }

        let io_err = |err| SimError::io(file_name, err);
        let mut file = std::fs::File::create(file_name).map_err(io_err)?;
        write!(file, "{}", result.join("")).map_err(io_err)?;
        info!("`{}` history written to {}", obj_name, file_name.display());
        Ok(())
    }

    pub fn print_state(&self) {
        for obj in self.zero_dim.iter() {
            println!("{}", obj.get_state());
        }

        for (zero_dim, links) in self.zero_dim.iter().zip(self.zero_dim_links.iter()) {
            let flux = links.iter().fold(WallFlux::new(), |sum, (conn, side)| {
                sum + self.connector[*conn].flux_at(*side, self.time)
            });
            println!("`{}`, {:?}", zero_dim.name(), flux);
        }
    }

    fn find(&self, obj_name: &str) -> Result<&ObjectInfo> {
        self.objs_info
            .iter()
            .find(|info| info.name == obj_name)
            .ok_or_else(|| SimError::UnknownObject(obj_name.to_string()))
    }

    fn store_data(&mut self) {
        self.stored_time.push(self.time);
        for info in self.objs_info.iter_mut() {
            let data = match info.obj_type {
                ObjectType::ZeroDim => self.zero_dim[info.index].get_storable_data(),
                ObjectType::Connector => self.connector[info.index].get_storable_data(),
            };
            info.stored.data.push(data);
        }
    }

    fn setup_indexes(&mut self) -> Result<()> {
        let mut connector_objects_index: Vec<Vec<usize>> = Vec::new();
        for conn in self.connector.iter() {
            if conn.connecting().len() != 2 {
                return Err(SimError::connection(
                    conn.name(),
                    format!("must connect exactly two objects, connecting: {}", conn.connecting().len()),
                ));
            }
            let mut indexes = Vec::with_capacity(2);
            for obj in conn.connecting().iter() {
                let index = self
                    .zero_dim
                    .iter()
                    .position(|z| z.name() == obj)
                    .ok_or_else(|| SimError::UnknownObject(obj.clone()))?;
                indexes.push(index);
            }
            connector_objects_index.push(indexes);
        }

        let mut zero_dim_links: Vec<Vec<(usize, usize)>> = Vec::new();
        for zero in self.zero_dim.iter() {
            let mut links: Vec<(usize, usize)> = Vec::new();
            for (index, conn) in self.connector.iter().enumerate() {
                if let Some(side) = conn.connecting().iter().position(|name| name == zero.name()) {
                    links.push((index, side));
                }
            }
            if links.is_empty() {
                debug!("`{}` is not connected to any wall", zero.name());
            }
            zero_dim_links.push(links);
        }

        self.connector_objects_index = connector_objects_index;
        self.zero_dim_links = zero_dim_links;
        Ok(())
    }
}

/// Times `start + i*dt` up to `end`, the last one clamped to `end`.
///
/// Built from multiples of `dt` instead of a running sum, so the last target is `end` exactly.
pub(crate) fn step_targets(start: f64, end: f64, dt: f64) -> impl Iterator<Item = f64> {
    let steps = if end > start && dt > 0.0 {
        ((end - start) / dt - 1e-9).ceil() as usize
    } else {
        0
    };
    (1..=steps).map(move |i| (start + i as f64 * dt).min(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::AIR_MECHANISM;
    use crate::{Gas, SystemBuilder};

    fn compression_net() -> ReactorNet {
        let mut gas = Gas::from_json_str(AIR_MECHANISM).unwrap();
        gas.TP(300.0, 1e5).unwrap();
        let mut builder = SystemBuilder::new();
        builder
            .add_reactor("reactor", 1.0, &gas)
            .unwrap()
            .add_environment("env", &gas)
            .unwrap()
            .add_wall("piston", 1.0, 0.0, Box::new(-1.0), vec!["reactor", "env"])
            .unwrap();
        builder.build_system().unwrap()
    }

    #[test]
    fn initial_state_is_stored() {
        let net = compression_net();
        assert_eq!(net.time(), 0.0);
        assert_eq!(net.stored_time(), &vec![0.0]);
        let history = net.history("reactor").unwrap();
        assert_eq!(history.dim(), (1, 5));
        assert!((history[[0, 1]] - 1.0).abs() < 1e-12); // bar
        assert_eq!(history[[0, 3]], 1e6); // cm³
    }

    #[test]
    fn advance_to_stops_at_end_time() {
        let mut net = compression_net();
        net.advance_to(0.105, 0.01).unwrap();
        assert!((net.time() - 0.105).abs() < 1e-12);
        assert_eq!(net.stored_time().len(), 12);
        let volume = net.get_state("reactor").unwrap().volume.unwrap();
        assert!((volume - 0.895).abs() < 1e-9);
        assert_eq!(net.history("piston").unwrap().ncols(), 4);
    }

    #[test]
    fn step_targets_end_exactly() {
        let targets: Vec<f64> = step_targets(0.0, 0.05, 1e-4).collect();
        assert_eq!(targets.len(), 500);
        assert_eq!(*targets.last().unwrap(), 0.05);
        assert_eq!(step_targets(0.0, 0.105, 0.01).count(), 11);
        assert_eq!(step_targets(1.0, 1.0, 0.1).count(), 0);
    }

    #[test]
    fn clone_is_independent() {
        let mut net = compression_net();
        let snapshot = net.clone();
        net.advance(0.1).unwrap();
        assert_eq!(snapshot.time(), 0.0);
        assert_eq!(snapshot.get_state("reactor").unwrap().volume, Some(1.0));
    }

    #[test]
    fn unknown_objects_and_bad_steps() {
        let mut net = compression_net();
        assert!(matches!(net.history("nope"), Err(SimError::UnknownObject(_))));
        assert!(net.get_state("piston").is_err());
        assert!(matches!(net.advance(0.0), Err(SimError::Config(_))));
        assert!(net.advance(-1.0).is_err());
    }

    #[test]
    fn collapsing_reactor_stops_the_network() {
        let mut net = compression_net();
        assert!(matches!(net.advance_to(2.0, 0.1), Err(SimError::State { .. })));
    }

    #[test]
    fn failed_step_leaves_the_network_untouched() {
        let mut gas = Gas::from_json_str(AIR_MECHANISM).unwrap();
        gas.TP(300.0, 1e5).unwrap();
        let mut builder = SystemBuilder::new();
        builder
            .add_reactor("steady", 1.0, &gas)
            .unwrap()
            .add_reactor("crushed", 0.5, &gas)
            .unwrap()
            .add_environment("env", &gas)
            .unwrap()
            .add_wall("slow", 1.0, 0.0, Box::new(-0.1), vec!["steady", "env"])
            .unwrap()
            .add_wall("fast", 1.0, 0.0, Box::new(-1.0), vec!["crushed", "env"])
            .unwrap();
        let mut net = builder.build_system().unwrap();

        assert!(matches!(net.advance(1.0), Err(SimError::State { .. })));
        assert_eq!(net.time(), 0.0);
        assert_eq!(net.stored_time().len(), 1);
        assert_eq!(net.get_state("steady").unwrap().volume, Some(1.0));
        assert_eq!(net.get_state("steady").unwrap().temperature, 300.0);

        net.advance(0.1).unwrap();
        assert!((net.get_state("steady").unwrap().volume.unwrap() - 0.99).abs() < 1e-12);
        assert!((net.get_state("crushed").unwrap().volume.unwrap() - 0.4).abs() < 1e-12);
        assert_eq!(net.stored_time().len(), 2);
    }

    #[test]
    fn prints_state_after_a_step() {
        let mut net = compression_net();
        net.advance(0.01).unwrap();
        net.print_state();
        assert!(net.get_state("env").unwrap().volume.is_none());
    }

    #[test]
    fn writes_history_with_headers() {
        let mut net = compression_net();
        net.advance(0.01).unwrap().advance(0.01).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reactor.txt");
        net.write_to_file(&path, "reactor", Some((1, 10))).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "time [s]\tpressure [bar]\ttemperature [K]\tvolume [cm³]\tmass [mg]"
        );
        assert!(lines[1].starts_with("0.01\t"));
        assert_eq!(lines[2].split('\t').count(), 5);
    }
}
